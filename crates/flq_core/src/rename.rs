//! Key renaming and hoisting over the flat form.

use crate::deflatten::deflatten;
use crate::flatten::{FlatMap, flatten};
use serde_json::Value;

/// Rename keys anywhere in a nested structure.
///
/// Works on the flat form, so a mapping can move a property deeper
/// (`"apple"` to `"fruit.apple"`) or hoist it up (`"fruit.apple"` to
/// `"apple"`). For each flat key the first mapping that applies wins: an
/// exact match replaces the whole key, a segment-prefix match (the old path
/// followed by `.` or `[`) replaces the prefix and keeps the rest. Keys no
/// mapping touches pass through unchanged.
///
/// # Example
/// ```
/// use flq_core::rename;
/// use serde_json::json;
///
/// let renamed = rename(
///     &json!({"user": {"name": "John"}, "settings": {"theme": "dark"}}),
///     &[("user.name", "fullName"), ("settings", "config")],
/// );
/// assert_eq!(renamed, json!({"fullName": "John", "config": {"theme": "dark"}}));
/// ```
pub fn rename(value: &Value, mapping: &[(&str, &str)]) -> Value {
    let flat = flatten(value);
    let mut renamed = FlatMap::new();
    for (key, leaf) in &flat {
        let new_key = mapping
            .iter()
            .copied()
            .find_map(|(old, new)| rewrite(key, old, new))
            .unwrap_or_else(|| key.clone());
        renamed.insert(new_key, leaf.clone());
    }
    deflatten(&renamed)
}

/// The rewritten key if `old` addresses `key` exactly or as a segment prefix.
fn rewrite(key: &str, old: &str, new: &str) -> Option<String> {
    if key == old {
        return Some(new.to_string());
    }
    let rest = key.strip_prefix(old)?;
    if rest.starts_with('.') || rest.starts_with('[') {
        return Some(format!("{new}{rest}"));
    }
    None
}
