//! Merchants and vehicles: whole-document overwrite with no identity merge

use serde_json::Value;

use super::ImportResult;
use crate::bail_structural;
use crate::domain::Domain;
use crate::error::Result;

pub(super) fn import(domain: Domain, data: &Value) -> Result<(Value, ImportResult)> {
    let document = match data.get(domain.name()) {
        Some(nested) if nested.is_object() => nested,
        _ => data,
    };

    if !document.is_object() {
        bail_structural!(domain, "expected an object");
    }

    let result = ImportResult {
        success: 1,
        ..Default::default()
    };
    Ok((document.clone(), result))
}
