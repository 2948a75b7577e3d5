//! Business checklist import
//!
//! The checklist has no per-record merge: both modes overwrite the whole
//! document after validating it.

use serde_json::{json, Value};

use super::{ImportMode, ImportResult};
use crate::bail_structural;
use crate::domain::Domain;
use crate::error::Result;
use crate::value::has_array;

const REQUIRED_BUSINESS_FIELDS: [&str; 3] = ["businessCode", "businessName", "tierId"];

pub(super) fn import(
    _current: Option<Value>,
    data: &Value,
    mode: ImportMode,
) -> Result<(Value, ImportResult)> {
    if !has_array(data, "tiers") {
        bail_structural!(Domain::Checklist, "tiers must be an array");
    }
    if !has_array(data, "businesses") {
        bail_structural!(Domain::Checklist, "businesses must be an array");
    }

    let businesses = data["businesses"].as_array().map(Vec::as_slice).unwrap_or_default();
    for (i, business) in businesses.iter().enumerate() {
        if let Some(field) = REQUIRED_BUSINESS_FIELDS
            .iter()
            .find(|field| business.get(**field).map_or(true, Value::is_null))
        {
            bail_structural!(Domain::Checklist, "business #{} is missing {}", i + 1, field);
        }
    }

    let mut document = data.clone();
    if let Some(fields) = document.as_object_mut() {
        fields.entry("products").or_insert_with(|| json!([]));
        fields.entry("productOrder").or_insert_with(|| json!([]));
    }

    let tiers = data["tiers"].as_array().map_or(0, Vec::len);
    let mut result = ImportResult {
        success: businesses.len(),
        ..Default::default()
    };
    result.messages.push(format!(
        "imported {} businesses across {} tiers",
        businesses.len(),
        tiers
    ));
    if mode == ImportMode::Merge {
        tracing::debug!("checklist merge overwrites the whole configuration");
    }

    Ok((document, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackportError;

    fn sample() -> Value {
        json!({
            "tiers": [{"id": 1, "name": "Gold", "icon": "star", "color": "#fc0"}],
            "businesses": [{
                "businessCode": "B1",
                "businessName": "Bakery",
                "tierId": 1,
                "status": "open",
                "maxStock": 100,
                "collectionStorage": 20,
                "canCollectItems": true,
                "notes": "",
                "productId": 3
            }],
            "products": [{"id": 3, "tierId": 1, "productName": "Bread"}],
            "productOrder": [3]
        })
    }

    #[test]
    fn test_replace_stores_document_verbatim() {
        let (document, result) = import(None, &sample(), ImportMode::Replace).unwrap();
        assert_eq!(document, sample());
        assert_eq!((result.success, result.updated, result.errors), (1, 0, 0));
    }

    #[test]
    fn test_merge_also_overwrites() {
        let current = json!({
            "tiers": [],
            "businesses": [{"businessCode": "OLD", "businessName": "Old", "tierId": 9}],
            "products": [],
            "productOrder": []
        });
        let (document, _) = import(Some(current), &sample(), ImportMode::Merge).unwrap();
        assert_eq!(document, sample());
    }

    #[test]
    fn test_missing_optional_collections_default_empty() {
        let (document, _) = import(
            None,
            &json!({"tiers": [], "businesses": []}),
            ImportMode::Replace,
        )
        .unwrap();
        assert_eq!(document["products"], json!([]));
        assert_eq!(document["productOrder"], json!([]));
    }

    #[test]
    fn test_requires_arrays() {
        let err = import(None, &json!({"tiers": []}), ImportMode::Merge).unwrap_err();
        assert!(matches!(err, TrackportError::Structural { .. }));
        assert_eq!(err.to_string(), "invalid checklist data: businesses must be an array");
    }

    #[test]
    fn test_business_missing_required_field() {
        let payload = json!({
            "tiers": [],
            "businesses": [{"businessCode": "B1", "businessName": "Bakery"}]
        });
        let err = import(None, &payload, ImportMode::Replace).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid checklist data: business #1 is missing tierId"
        );
    }
}
