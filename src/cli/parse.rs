use trackport_core::{Domain, ImportMode};

pub fn parse_domain(s: &str) -> Result<Domain, String> {
    s.parse::<Domain>().map_err(|e| e.to_string())
}

pub fn parse_mode(s: &str) -> Result<ImportMode, String> {
    s.parse::<ImportMode>().map_err(|e| e.to_string())
}
