//! Path resolution with array tunneling.

use crate::path::Segment;
use serde_json::Value;

/// Result of resolving a flat path against a nested value.
///
/// A path that crosses an array without a concrete index is applied to every
/// element (a "tunnel"), so a resolution is either one value, a flat sequence
/// of per-leaf outcomes, or nothing at all. Keeping the three shapes distinct
/// means a genuine array leaf can never be confused with tunnel output.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// The path reached exactly one value without tunneling.
    Single(&'a Value),
    /// At least one tunnel was crossed. Each entry is one leaf outcome;
    /// `None` marks an element where the remaining path addressed nothing.
    Multi(Vec<Option<&'a Value>>),
    /// The path addressed nothing.
    Missing,
}

/// Resolve `segments` against `value`.
///
/// Rules, in order:
/// 1. No segments left: the current value itself.
/// 2. `null` current value with segments left: `Missing`.
/// 3. Array current value and a key segment next: tunnel. The entire
///    remaining path is applied to every element; single outcomes contribute
///    one entry, nested tunnel outcomes are merged flat (one level), missing
///    outcomes contribute an explicit absent entry. An empty collection
///    collapses to `Missing`, so "no matching child anywhere" and "field
///    absent" are the same observation.
/// 4. Otherwise: direct key/index lookup and recursion over the tail.
pub fn resolve<'a>(value: &'a Value, segments: &[Segment]) -> Resolved<'a> {
    let Some((head, tail)) = segments.split_first() else {
        return Resolved::Single(value);
    };

    if value.is_null() {
        return Resolved::Missing;
    }

    if let (Value::Array(items), Segment::Key(_)) = (value, head) {
        let mut leaves: Vec<Option<&'a Value>> = Vec::new();
        for item in items {
            match resolve(item, segments) {
                Resolved::Single(v) => leaves.push(Some(v)),
                Resolved::Multi(inner) => leaves.extend(inner),
                Resolved::Missing => leaves.push(None),
            }
        }
        if leaves.is_empty() {
            return Resolved::Missing;
        }
        return Resolved::Multi(leaves);
    }

    let next = match (value, head) {
        (Value::Object(members), Segment::Key(key)) => members.get(key),
        (Value::Array(items), Segment::Index(index)) => items.get(*index),
        _ => None,
    };
    match next {
        Some(child) => resolve(child, tail),
        None => Resolved::Missing,
    }
}
