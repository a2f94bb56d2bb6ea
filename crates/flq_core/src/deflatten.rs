//! Deflattener: flat path/leaf mapping back to a nested value tree.

use crate::Error;
use crate::flatten::FlatMap;
use crate::path::{self, Segment};
use serde_json::{Map, Value};

/// Rebuild a nested value from a [`FlatMap`].
///
/// Entries are processed in the mapping's own key order; later keys sharing a
/// prefix extend the container created by earlier keys. The kind of each
/// intermediate container is inferred from the segment that follows it: an
/// index segment materializes an array, anything else an object. Sparse index
/// sequences are legal and leave `null` holes.
///
/// # Example
/// ```
/// use flq_core::{deflatten, flatten};
/// use serde_json::json;
///
/// let original = json!({"a": {"b": 1}, "tags": ["x", "y"]});
/// assert_eq!(deflatten(&flatten(&original)), original);
/// ```
pub fn deflatten(flat: &FlatMap) -> Value {
    let mut root = root_for(flat);
    for (key, leaf) in flat {
        let segments = path::parse(key);
        insert(&mut root, &segments, leaf.clone());
    }
    root
}

/// Deflatten the serialized textual form of a flat mapping.
pub fn deflatten_json(text: &str) -> Result<Value, Error> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::parse("deflatten", &e))?;
    match value {
        Value::Object(flat) => Ok(deflatten(&flat)),
        _ => Err(Error::Parse {
            op: "deflatten",
            message: "expected a JSON object of flat paths".to_string(),
        }),
    }
}

/// Deflatten and immediately re-serialize the reconstruction to JSON text.
pub fn deflatten_to_json(flat: &FlatMap) -> Result<String, Error> {
    serde_json::to_string(&deflatten(flat)).map_err(|e| Error::parse("deflatten", &e))
}

/// The root container's kind comes from the first segment of the first key;
/// an empty mapping rebuilds as an empty object.
fn root_for(flat: &FlatMap) -> Value {
    let first = flat.keys().next().map(|key| path::parse(key));
    match first {
        Some(segments) if matches!(segments.first(), Some(Segment::Index(_))) => {
            Value::Array(Vec::new())
        }
        _ => Value::Object(Map::new()),
    }
}

fn insert(root: &mut Value, segments: &[Segment], leaf: Value) {
    let Some((last, walked)) = segments.split_last() else {
        // A key with no segments (e.g. the empty string) addresses nothing.
        return;
    };
    let mut current = root;
    for (i, segment) in walked.iter().enumerate() {
        let next_is_index = matches!(segments.get(i + 1), Some(Segment::Index(_)));
        match descend(current, segment, next_is_index) {
            Some(child) => current = child,
            None => return,
        }
    }
    if let Some(slot) = slot_mut(current, last) {
        *slot = leaf;
    }
}

/// Step into the container a segment addresses, materializing it if the slot
/// is vacant or holds a leaf.
fn descend<'a>(
    current: &'a mut Value,
    segment: &Segment,
    next_is_index: bool,
) -> Option<&'a mut Value> {
    let slot = slot_mut(current, segment)?;
    if !slot.is_object() && !slot.is_array() {
        *slot = if next_is_index {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        };
    }
    Some(slot)
}

/// A `&mut` handle to the value a segment addresses, creating the slot when
/// absent. An index segment against an object writes under the stringified
/// index; a key segment against an array addresses nothing.
fn slot_mut<'a>(current: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (current, segment) {
        (Value::Object(members), Segment::Key(key)) => {
            Some(members.entry(key.clone()).or_insert(Value::Null))
        }
        (Value::Object(members), Segment::Index(index)) => {
            Some(members.entry(index.to_string()).or_insert(Value::Null))
        }
        (Value::Array(items), Segment::Index(index)) => {
            if *index >= items.len() {
                items.resize(*index + 1, Value::Null);
            }
            items.get_mut(*index)
        }
        _ => None,
    }
}
