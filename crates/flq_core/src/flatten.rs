//! Flattener: nested value tree to flat path/leaf mapping.

use crate::Error;
use crate::path;
use serde_json::{Map, Value};

/// Flat mapping from canonical path strings to scalar (or `null`) leaves.
///
/// Iteration order is insertion order, so a flattened mapping replays in the
/// source value's own depth-first order.
pub type FlatMap = Map<String, Value>;

/// Flatten a nested value into a [`FlatMap`].
///
/// `null` leaves are emitted as-is, never recursed into. Empty arrays and
/// empty objects contribute no leaves and are therefore lost on a
/// flatten/deflatten round trip; that limitation is part of the contract.
///
/// # Example
/// ```
/// use flq_core::flatten;
/// use serde_json::json;
///
/// let flat = flatten(&json!({"a": {"b": 1}, "tags": ["x"]}));
/// assert_eq!(flat.get("a.b"), Some(&json!(1)));
/// assert_eq!(flat.get("tags[0]"), Some(&json!("x")));
/// ```
pub fn flatten(value: &Value) -> FlatMap {
    flatten_with_prefix(value, "")
}

/// Flatten with every emitted path placed under `prefix`.
pub fn flatten_with_prefix(value: &Value, prefix: &str) -> FlatMap {
    let mut out = FlatMap::new();
    walk(value, prefix, &mut out);
    out
}

/// Flatten the serialized textual form of a value.
pub fn flatten_json(text: &str, prefix: &str) -> Result<FlatMap, Error> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::parse("flatten", &e))?;
    Ok(flatten_with_prefix(&value, prefix))
}

fn walk(value: &Value, prefix: &str, out: &mut FlatMap) {
    match value {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let slot = path::child_index(prefix, index);
                emit(item, slot, out);
            }
        }
        Value::Object(members) => {
            for (key, item) in members {
                let slot = path::child_key(prefix, key);
                emit(item, slot, out);
            }
        }
        leaf => {
            out.insert(prefix.to_string(), leaf.clone());
        }
    }
}

fn emit(item: &Value, slot: String, out: &mut FlatMap) {
    if item.is_object() || item.is_array() {
        walk(item, &slot, out);
    } else {
        out.insert(slot, item.clone());
    }
}
