//! Apartment import
//!
//! Apartments are keyed by `id`. A payload may also carry `timers`, which only
//! touch `due_date`/`clean_time` of matching apartments, and `reviews`, which
//! merge into each apartment's own review list by review `id`. Timers and
//! reviews are applied after the apartment collection in both modes.

use serde_json::{Map, Value};

use super::merge::merge_records;
use super::{ImportMode, ImportResult};
use crate::bail_structural;
use crate::domain::Domain;
use crate::error::Result;
use crate::value::identity_key;

const TIMER_FIELDS: [&str; 2] = ["due_date", "clean_time"];

pub(super) fn import(
    current: Option<Value>,
    data: &Value,
    mode: ImportMode,
) -> Result<(Value, ImportResult)> {
    let incoming = incoming_apartments(data);
    let timers = data.get("timers").and_then(Value::as_array);
    let reviews = data.get("reviews").and_then(Value::as_array);

    if incoming.is_none() && timers.is_none() && reviews.is_none() {
        bail_structural!(Domain::Apartments, "no apartments, timers or reviews found");
    }

    let mut document = current_document(current);
    let mut apartments = document
        .get("apartments")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut result = ImportResult::default();

    if let Some(incoming) = incoming {
        match mode {
            ImportMode::Replace => {
                apartments = incoming.to_vec();
                result.success += apartments.len();
            }
            ImportMode::Merge => {
                merge_records(&mut apartments, incoming, "apartment", by_id, &mut result);
            }
        }
    }

    if let Some(timers) = timers {
        apply_timers(&mut apartments, timers, &mut result);
    }

    if let Some(reviews) = reviews {
        apply_reviews(&mut apartments, reviews, &mut result);
    }

    document.insert("apartments".to_string(), Value::Array(apartments));
    if let Some(version) = incoming_version(data) {
        if mode == ImportMode::Replace || !document.contains_key("version") {
            document.insert("version".to_string(), version.clone());
        }
    }

    Ok((Value::Object(document), result))
}

fn by_id(record: &Value) -> Option<String> {
    identity_key(record.get("id"))
}

/// Locate the apartment list in any of the accepted payload shapes:
/// a bare (legacy) array, `{apartments: {apartments: [...]}}` or `{apartments: [...]}`.
fn incoming_apartments(data: &Value) -> Option<&[Value]> {
    if let Value::Array(items) = data {
        if items.iter().all(looks_like_apartment) {
            return Some(items.as_slice());
        }
        return None;
    }

    match data.get("apartments")? {
        Value::Array(items) => Some(items.as_slice()),
        Value::Object(nested) => nested
            .get("apartments")
            .and_then(Value::as_array)
            .map(Vec::as_slice),
        _ => None,
    }
}

/// Bare array elements are apartments when they carry `apartment_name`, or an
/// `id` without the `apartment_id` back-reference that timers and reviews have.
/// Unified payloads hand the `apartments` array over bare, without names.
fn looks_like_apartment(item: &Value) -> bool {
    item.get("apartment_name").is_some()
        || (item.get("id").is_some() && item.get("apartment_id").is_none())
}

fn incoming_version(data: &Value) -> Option<&Value> {
    data.get("apartments")
        .and_then(|nested| nested.get("version"))
        .or_else(|| data.get("version"))
}

/// Stored document as an object, lifting a legacy bare array
fn current_document(current: Option<Value>) -> Map<String, Value> {
    match current {
        Some(Value::Object(map)) => map,
        Some(Value::Array(items)) => {
            let mut map = Map::new();
            map.insert("apartments".to_string(), Value::Array(items));
            map.insert("version".to_string(), Value::from(1));
            map
        }
        _ => match Domain::Apartments.empty_data() {
            Value::Object(map) => map,
            _ => Map::new(),
        },
    }
}

fn find_apartment<'a>(apartments: &'a mut [Value], id: &str) -> Option<&'a mut Value> {
    apartments
        .iter_mut()
        .find(|apt| by_id(apt).as_deref() == Some(id))
}

fn apply_timers(apartments: &mut [Value], timers: &[Value], result: &mut ImportResult) {
    for (i, timer) in timers.iter().enumerate() {
        let Some(id) = identity_key(timer.get("apartment_id")) else {
            result.record_error(format!("timer #{} has no apartment_id", i + 1));
            continue;
        };
        let Some(Value::Object(apartment)) = find_apartment(apartments, &id) else {
            result.record_error(format!("timer #{} references unknown apartment {}", i + 1, id));
            continue;
        };

        for field in TIMER_FIELDS {
            if let Some(value) = timer.get(field) {
                apartment.insert(field.to_string(), value.clone());
            }
        }
        result.updated += 1;
        tracing::debug!(apartment = %id, "timer applied");
    }
}

fn apply_reviews(apartments: &mut [Value], reviews: &[Value], result: &mut ImportResult) {
    for (i, review) in reviews.iter().enumerate() {
        let Some(id) = identity_key(review.get("apartment_id")) else {
            result.record_error(format!("review #{} has no apartment_id", i + 1));
            continue;
        };
        let Some(Value::Object(apartment)) = find_apartment(apartments, &id) else {
            result.record_error(format!("review #{} references unknown apartment {}", i + 1, id));
            continue;
        };

        let entry = apartment
            .entry("reviews")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(existing) = entry {
            merge_records(existing, std::slice::from_ref(review), "review", by_id, result);
        }
    }
}
