//! Import format detection
//!
//! Payloads carry no format tag, so they are classified structurally by an
//! ordered list of rules. The order matters: several formats overlap and
//! documents in the wild rely on the current precedence.

use serde::Serialize;
use serde_json::Value;

use crate::domain::Domain;
use crate::value::{has_array, has_object, is_truthy};

/// Top-level keys that only appear on export envelopes
const ENVELOPE_KEYS: [&str; 3] = ["export_date", "hashes", "hash"];

/// The structural format of an import payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    Unified,
    Checklist,
    ApartmentAll,
    ApartmentOnly,
    TimerOnly,
    ReviewOnly,
    Merchants,
    Vehicles,
    Education,
    Fishing,
    Logistics,
    Unknown,
}

impl FormatKind {
    /// The domain a single-domain format imports into
    pub fn domain(self) -> Option<Domain> {
        match self {
            FormatKind::Checklist => Some(Domain::Checklist),
            FormatKind::ApartmentAll
            | FormatKind::ApartmentOnly
            | FormatKind::TimerOnly
            | FormatKind::ReviewOnly => Some(Domain::Apartments),
            FormatKind::Merchants => Some(Domain::Merchants),
            FormatKind::Vehicles => Some(Domain::Vehicles),
            FormatKind::Education => Some(Domain::Education),
            FormatKind::Fishing => Some(Domain::Fishing),
            FormatKind::Logistics => Some(Domain::Logistics),
            FormatKind::Unified | FormatKind::Unknown => None,
        }
    }

    fn description(self) -> &'static str {
        match self {
            FormatKind::Unified => "Unified export",
            FormatKind::Checklist => "Business checklist configuration",
            FormatKind::ApartmentAll => "Apartments with timers and reviews",
            FormatKind::ApartmentOnly => "Apartments only",
            FormatKind::TimerOnly => "Apartment timers only",
            FormatKind::ReviewOnly => "Apartment reviews only",
            FormatKind::Merchants => "Traveling merchants",
            FormatKind::Vehicles => "Vehicle deliveries",
            FormatKind::Education => "Education timers",
            FormatKind::Fishing => "Fishing locations, fish and rewards",
            FormatKind::Logistics => "Logistics companies, licenses and jobs",
            FormatKind::Unknown => "Unrecognized format",
        }
    }
}

/// Result of classifying a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedFormat {
    #[serde(rename = "type")]
    pub kind: FormatKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<Domain>,
    pub description: String,
}

impl DetectedFormat {
    fn single(kind: FormatKind) -> Self {
        DetectedFormat {
            kind,
            domain: kind.domain(),
            domains: Vec::new(),
            description: kind.description().to_string(),
        }
    }

    fn unified(domains: Vec<Domain>) -> Self {
        let names: Vec<&str> = domains.iter().map(|d| d.name()).collect();
        DetectedFormat {
            kind: FormatKind::Unified,
            domain: None,
            description: format!("Unified export containing: {}", names.join(", ")),
            domains,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.kind == FormatKind::Unknown
    }
}

/// Classify an arbitrary parsed payload.
///
/// A payload is unified when it carries truthy top-level keys for two or more
/// domains, or for one domain together with an export envelope field, or for
/// one domain whose document is not recognized as that same domain's format. Exclusion is
/// not applied here; excluded domains are still reported.
pub fn detect_format(data: &Value) -> DetectedFormat {
    let present: Vec<Domain> = Domain::ALL
        .into_iter()
        .filter(|d| data.get(d.name()).is_some_and(is_truthy))
        .collect();

    let single = classify_single(data);

    let unified = match present.as_slice() {
        [] => false,
        [only] => has_envelope(data) || single.and_then(FormatKind::domain) != Some(*only),
        _ => true,
    };

    if unified {
        return DetectedFormat::unified(present);
    }

    DetectedFormat::single(single.unwrap_or(FormatKind::Unknown))
}

fn has_envelope(data: &Value) -> bool {
    ENVELOPE_KEYS.iter().any(|key| data.get(*key).is_some())
}

fn lacks(data: &Value, field: &str) -> bool {
    !data.get(field).is_some_and(is_truthy)
}

/// Single-domain rules, first match wins
fn classify_single(data: &Value) -> Option<FormatKind> {
    if has_array(data, "tiers") && has_array(data, "businesses") {
        return Some(FormatKind::Checklist);
    }

    if has_array(data, "apartments") {
        if has_array(data, "timers") && has_array(data, "reviews") {
            return Some(FormatKind::ApartmentAll);
        }
        return Some(FormatKind::ApartmentOnly);
    }

    if has_array(data, "timers") && lacks(data, "apartments") {
        return Some(FormatKind::TimerOnly);
    }

    if has_array(data, "reviews") && lacks(data, "apartments") {
        return Some(FormatKind::ReviewOnly);
    }

    if has_object(data, "merchants") {
        return Some(FormatKind::Merchants);
    }

    if has_object(data, "vehicles") {
        return Some(FormatKind::Vehicles);
    }

    if looks_like_education(data) {
        return Some(FormatKind::Education);
    }

    if has_array(data, "locations") && has_array(data, "fish") && has_array(data, "rewards") {
        return Some(FormatKind::Fishing);
    }

    if has_array(data, "companies")
        && has_array(data, "licenses")
        && has_array(data, "jobs")
        && has_object(data, "config")
    {
        return Some(FormatKind::Logistics);
    }

    None
}

fn looks_like_education(data: &Value) -> bool {
    match data {
        Value::Array(items) => items.first().is_some_and(|first| {
            first.get("name").is_some_and(is_truthy) && first.get("secondsRemaining").is_some()
        }),
        // legacy exports wrote array-likes with a `length` property
        Value::Object(map) => map.get("trainings").is_some_and(is_truthy) || map.contains_key("length"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kind(data: Value) -> FormatKind {
        detect_format(&data).kind
    }

    #[test]
    fn test_unknown() {
        let detected = detect_format(&json!({"foo": "bar"}));
        assert_eq!(detected.kind, FormatKind::Unknown);
        assert!(detected.is_unknown());
        assert_eq!(detected.domain, None);
        assert_eq!(kind(json!(42)), FormatKind::Unknown);
        assert_eq!(kind(json!([])), FormatKind::Unknown);
    }

    #[test]
    fn test_unified_with_multiple_domains() {
        let detected = detect_format(&json!({
            "checklist": {"tiers": [], "businesses": []},
            "education": [],
            "merchants": {"a": 1},
        }));
        assert_eq!(detected.kind, FormatKind::Unified);
        assert_eq!(
            detected.domains,
            vec![Domain::Checklist, Domain::Merchants, Domain::Education]
        );
        assert!(detected.description.contains("checklist, merchants, education"));
    }

    #[test]
    fn test_unified_single_domain_export_envelope() {
        let detected = detect_format(&json!({
            "export_date": "2024-01-01T00:00:00.000Z",
            "version": "1.0.0",
            "apartments": {"apartments": [], "version": 1},
            "hash": "abc",
        }));
        assert_eq!(detected.kind, FormatKind::Unified);
        assert_eq!(detected.domains, vec![Domain::Apartments]);
    }

    #[test]
    fn test_single_domain_key_without_rule_is_unified() {
        let detected = detect_format(&json!({"fishing": {"locations": []}}));
        assert_eq!(detected.kind, FormatKind::Unified);
        assert_eq!(detected.domains, vec![Domain::Fishing]);
    }

    #[test]
    fn test_single_domain_key_with_foreign_rule_is_unified() {
        let detected = detect_format(&json!({
            "apartments": [{"id": 2, "location": "C"}],
            "tiers": [],
            "businesses": [],
        }));
        assert_eq!(detected.kind, FormatKind::Unified);
        assert_eq!(detected.domains, vec![Domain::Apartments]);
    }

    #[test]
    fn test_falsy_domain_keys_ignored() {
        assert_eq!(
            kind(json!({"education": null, "tiers": [], "businesses": []})),
            FormatKind::Checklist
        );
    }

    #[test]
    fn test_merchants_format_still_detected() {
        let detected = detect_format(&json!({"merchants": {"m1": {"name": "Bob"}}}));
        assert_eq!(detected.kind, FormatKind::Merchants);
        assert_eq!(detected.domain, Some(Domain::Merchants));
        assert_eq!(kind(json!({"vehicles": {}})), FormatKind::Vehicles);
    }

    #[test]
    fn test_checklist() {
        assert_eq!(
            kind(json!({"tiers": [], "businesses": [], "products": []})),
            FormatKind::Checklist
        );
        assert_eq!(kind(json!({"tiers": [], "businesses": {}})), FormatKind::Unknown);
    }

    #[test]
    fn test_apartment_formats() {
        assert_eq!(
            kind(json!({"apartments": [], "timers": [], "reviews": []})),
            FormatKind::ApartmentAll
        );
        assert_eq!(
            kind(json!({"apartments": [{"id": 1}], "timers": []})),
            FormatKind::ApartmentOnly
        );
        assert_eq!(kind(json!({"timers": [{"apartment_id": 1}]})), FormatKind::TimerOnly);
        assert_eq!(kind(json!({"reviews": []})), FormatKind::ReviewOnly);
        assert_eq!(
            detect_format(&json!({"timers": []})).domain,
            Some(Domain::Apartments)
        );
    }

    #[test]
    fn test_education_variants() {
        assert_eq!(
            kind(json!([{"name": "Welding", "secondsRemaining": 30}])),
            FormatKind::Education
        );
        assert_eq!(
            kind(json!([{"name": "Welding", "secondsRemaining": null}])),
            FormatKind::Education
        );
        assert_eq!(kind(json!([{"name": "Welding"}])), FormatKind::Unknown);
        assert_eq!(kind(json!({"trainings": [{"name": "x"}]})), FormatKind::Education);
        assert_eq!(
            kind(json!({"0": {"name": "x"}, "length": 1})),
            FormatKind::Education
        );
    }

    #[test]
    fn test_fishing_requires_all_three_collections() {
        assert_eq!(
            kind(json!({"locations": [], "fish": [], "rewards": []})),
            FormatKind::Fishing
        );
        assert_eq!(kind(json!({"locations": [], "fish": []})), FormatKind::Unknown);
    }

    #[test]
    fn test_logistics_requires_config_object() {
        assert_eq!(
            kind(json!({"companies": [], "licenses": [], "jobs": [], "config": {}})),
            FormatKind::Logistics
        );
        assert_eq!(
            kind(json!({"companies": [], "licenses": [], "jobs": [], "config": []})),
            FormatKind::Unknown
        );
    }

    #[test]
    fn test_checklist_rule_precedes_apartments() {
        assert_eq!(
            kind(json!({"tiers": [], "businesses": [], "timers": []})),
            FormatKind::Checklist
        );
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let json = serde_json::to_value(detect_format(&json!({"timers": []}))).unwrap();
        assert_eq!(json["type"], "timer_only");
        assert_eq!(json["domain"], "apartments");
        assert!(json.get("domains").is_none());
    }
}
