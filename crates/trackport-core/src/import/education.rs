//! Education timer import
//!
//! Trainings are keyed by `name`, compared case-insensitively.

use serde_json::Value;

use super::merge::merge_records;
use super::{ImportMode, ImportResult};
use crate::bail_structural;
use crate::domain::Domain;
use crate::error::Result;
use crate::value::name_key;

pub(super) fn import(
    current: Option<Value>,
    data: &Value,
    mode: ImportMode,
) -> Result<(Value, ImportResult)> {
    let incoming = incoming_trainings(data)?;
    let mut result = ImportResult::default();

    let trainings = match mode {
        ImportMode::Replace => {
            result.success = incoming.len();
            incoming
        }
        ImportMode::Merge => {
            let mut trainings = existing_trainings(current);
            merge_records(&mut trainings, &incoming, "training", by_name, &mut result);
            trainings
        }
    };

    Ok((Value::Array(trainings), result))
}

fn by_name(record: &Value) -> Option<String> {
    name_key(record.get("name"))
}

/// Accepts a bare array, `{trainings: [...]}`, or the values of any other object
fn incoming_trainings(data: &Value) -> Result<Vec<Value>> {
    let source = match data.get("trainings") {
        Some(trainings) if trainings.is_array() || trainings.is_object() => trainings,
        _ => data,
    };

    match source {
        Value::Array(items) => Ok(items.clone()),
        Value::Object(map) => Ok(map
            .iter()
            .filter(|(key, _)| key.as_str() != "length")
            .map(|(_, value)| value.clone())
            .collect()),
        _ => bail_structural!(Domain::Education, "expected an array of trainings"),
    }
}

/// Stored trainings with duplicate names collapsed, last one winning
fn existing_trainings(current: Option<Value>) -> Vec<Value> {
    let Some(Value::Array(stored)) = current else {
        return Vec::new();
    };

    let mut trainings: Vec<Value> = Vec::with_capacity(stored.len());
    for record in stored {
        let pos = by_name(&record).and_then(|key| {
            trainings
                .iter()
                .position(|t| by_name(t).as_deref() == Some(key.as_str()))
        });
        match pos {
            Some(pos) => trainings[pos] = record,
            None => trainings.push(record),
        }
    }
    trainings
}
