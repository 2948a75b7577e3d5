//! Identity-keyed overlay-or-append merging

use std::collections::HashMap;

use serde_json::Value;

use super::ImportResult;
use crate::value::overlay;

/// Merge `incoming` records into `existing` by identity.
///
/// Matched records are shallow-overlaid (incoming fields win) and counted as
/// updated; unmatched ones are appended and counted as new. Records that are
/// not objects or carry no identity are counted as errors and skipped.
/// Nothing in `existing` is ever removed.
pub(crate) fn merge_records<F>(
    existing: &mut Vec<Value>,
    incoming: &[Value],
    label: &str,
    identity: F,
    result: &mut ImportResult,
) where
    F: Fn(&Value) -> Option<String>,
{
    let mut index: HashMap<String, usize> = existing
        .iter()
        .enumerate()
        .filter_map(|(pos, record)| identity(record).map(|key| (key, pos)))
        .collect();

    for (i, record) in incoming.iter().enumerate() {
        if !record.is_object() {
            result.record_error(format!("{} #{} is not an object, skipped", label, i + 1));
            continue;
        }

        let Some(key) = identity(record) else {
            result.record_error(format!("{} #{} has no identity, skipped", label, i + 1));
            continue;
        };

        match index.get(&key) {
            Some(&pos) => {
                overlay(&mut existing[pos], record);
                result.updated += 1;
                tracing::debug!(record = label, key = %key, "updated existing record");
            }
            None => {
                index.insert(key.clone(), existing.len());
                existing.push(record.clone());
                result.success += 1;
                tracing::debug!(record = label, key = %key, "added record");
            }
        }
    }
}
