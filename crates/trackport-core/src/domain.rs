//! Page domains and their storage keys
//!
//! Each domain is an independent category of tracker data stored under exactly
//! one key. `merchants` and `vehicles` are permanently excluded from every
//! import/export operation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::TrackportError;

/// Storage key for the recorded hash checkpoint
pub const HASHES_KEY: &str = "importExportHashes";

/// A named category of tracker data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Checklist,
    Apartments,
    Merchants,
    Vehicles,
    Education,
    Fishing,
    Logistics,
}

impl Domain {
    /// Every known domain, in registry order
    pub const ALL: [Domain; 7] = [
        Domain::Checklist,
        Domain::Apartments,
        Domain::Merchants,
        Domain::Vehicles,
        Domain::Education,
        Domain::Fishing,
        Domain::Logistics,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Domain::Checklist => "checklist",
            Domain::Apartments => "apartments",
            Domain::Merchants => "merchants",
            Domain::Vehicles => "vehicles",
            Domain::Education => "education",
            Domain::Fishing => "fishing",
            Domain::Logistics => "logistics",
        }
    }

    /// The key/value store key holding this domain's JSON document
    pub fn storage_key(self) -> &'static str {
        match self {
            Domain::Checklist => "checklistConfigData",
            Domain::Apartments => "apartmentsData",
            Domain::Merchants => "traveling_merchants",
            Domain::Vehicles => "vehicle_delivery_progress",
            Domain::Education => "educationTimers",
            Domain::Fishing => "fishingData",
            Domain::Logistics => "logisticsData",
        }
    }

    /// Whether the domain is filtered from all import/export operations
    pub fn is_excluded(self) -> bool {
        matches!(self, Domain::Merchants | Domain::Vehicles)
    }

    /// Non-excluded domains, in registry order
    pub fn available() -> Vec<Domain> {
        Domain::ALL
            .into_iter()
            .filter(|d| !d.is_excluded())
            .collect()
    }

    /// Document written the first time a domain is populated
    pub fn empty_data(self) -> Value {
        match self {
            Domain::Checklist => json!({
                "tiers": [],
                "businesses": [],
                "products": [],
                "productOrder": [],
            }),
            Domain::Apartments => json!({ "apartments": [], "version": 1 }),
            Domain::Education => json!([]),
            Domain::Fishing => json!({
                "locations": [],
                "fish": [],
                "rewards": [],
                "version": 1,
            }),
            Domain::Logistics => json!({
                "companies": [],
                "licenses": [],
                "jobs": [],
                "config": {},
            }),
            Domain::Merchants | Domain::Vehicles => json!({}),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = TrackportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| TrackportError::UnknownDomain(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_excludes_merchants_and_vehicles() {
        let available = Domain::available();
        assert_eq!(
            available,
            vec![
                Domain::Checklist,
                Domain::Apartments,
                Domain::Education,
                Domain::Fishing,
                Domain::Logistics
            ]
        );
        assert!(Domain::Merchants.is_excluded());
        assert!(Domain::Vehicles.is_excluded());
    }

    #[test]
    fn test_parse_roundtrip() {
        for domain in Domain::ALL {
            assert_eq!(domain.name().parse::<Domain>().unwrap(), domain);
        }
        assert!(matches!(
            "boats".parse::<Domain>(),
            Err(TrackportError::UnknownDomain(_))
        ));
    }

    #[test]
    fn test_storage_keys_are_distinct() {
        let mut keys: Vec<_> = Domain::ALL.iter().map(|d| d.storage_key()).collect();
        keys.push(HASHES_KEY);
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }
}
