//! Bulk rewriting of nested structures: rule-driven array pruning and leaf
//! transforms.

use crate::Error;
use crate::deflatten::deflatten;
use crate::filter::flat_filter;
use crate::flatten::flatten;
use crate::path::{self, Segment};
use crate::query::Query;
use crate::select::wildcard_regex;
use serde_json::Value;

/// Prune nested arrays by rule.
///
/// Each rule maps a path containing `[*]` to a query; the array addressed by
/// the path is replaced, per element of `data`, with its filtered result.
/// A rule like `houses[*].boxes[*]` recurses: the outer wildcard walks each
/// `houses` entry, the remainder prunes its `boxes`. Elements where the
/// addressed array is absent (or not an array) are left untouched. The input
/// is never mutated.
///
/// Fails with [`Error::InvalidArgument`] when `data` is not an array or a
/// rule key carries no `[*]`.
pub fn flat_modify(data: &Value, rules: &[(&str, &Query)]) -> Result<Vec<Value>, Error> {
    let Value::Array(items) = data else {
        return Err(Error::invalid(
            "flat_modify expects an array as its first argument",
        ));
    };
    let mut result = items.clone();
    for (rule_path, query) in rules.iter().copied() {
        apply_rule(&mut result, rule_path, query)?;
    }
    Ok(result)
}

fn apply_rule(items: &mut [Value], rule_path: &str, query: &Query) -> Result<(), Error> {
    let Some((array_path, remainder)) = split_wildcard(rule_path) else {
        return Err(Error::invalid(format!(
            "flat_modify rule key must contain [*] to indicate an array, got \"{rule_path}\""
        )));
    };
    if array_path.is_empty() {
        return Ok(());
    }
    let segments = path::parse(array_path);
    for item in items.iter_mut() {
        let Some(target) = locate_mut(item, &segments) else {
            continue;
        };
        if !target.is_array() {
            continue;
        }
        let replacement = if remainder.is_empty() {
            flat_filter(target, query)?
        } else {
            let rest = remainder.strip_prefix('.').unwrap_or(remainder);
            flat_modify(target, &[(rest, query)])?
        };
        *target = Value::Array(replacement);
    }
    Ok(())
}

/// Split at the first `[*]`: `houses[*].boxes[*]` becomes
/// `("houses", ".boxes[*]")`.
fn split_wildcard(path: &str) -> Option<(&str, &str)> {
    let at = path.find("[*]")?;
    Some((&path[..at], &path[at + 3..]))
}

fn locate_mut<'a>(value: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in segments {
        current = match (current, segment) {
            (Value::Object(members), Segment::Key(key)) => members.get_mut(key)?,
            (Value::Array(items), Segment::Index(index)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Rewrite leaves by path over the flat form.
///
/// Each rule maps an exact flat path, or a `[*]`-wildcard pattern, to a
/// function applied to the leaves it addresses. Paths that address nothing
/// are ignored. The input is never mutated.
pub fn flat_transform(value: &Value, rules: &[(&str, &dyn Fn(&Value) -> Value)]) -> Value {
    let mut flat = flatten(value);
    for (pattern, apply) in rules.iter().copied() {
        if pattern.contains("[*]") {
            if let Some(re) = wildcard_regex(pattern) {
                for (key, leaf) in flat.iter_mut() {
                    if re.is_match(key) {
                        *leaf = apply(leaf);
                    }
                }
            }
        } else if let Some(leaf) = flat.get_mut(pattern) {
            *leaf = apply(leaf);
        }
    }
    deflatten(&flat)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn villages() -> Value {
        json!([
            {
                "name": "Village A",
                "houses": [
                    {"id": "h1", "color": "blue", "boxes": [{"id": "b1", "status": "fresh"}]},
                    {"id": "h2", "color": "red", "boxes": [{"id": "b2", "status": "rotten"}]},
                    {"id": "h3", "color": "blue", "boxes": [{"id": "b3", "status": "fresh"}]}
                ]
            },
            {
                "name": "Village B",
                "houses": [
                    {"id": "h4", "color": "red", "boxes": [{"id": "b4", "status": "fresh"}]}
                ]
            }
        ])
    }

    fn house_ids(village: &Value) -> Vec<&str> {
        village["houses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["id"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_modify_prunes_inner_array() {
        let no_red = Query::parse(&json!({"$not": {"color": "red"}})).unwrap();
        let result = flat_modify(&villages(), &[("houses[*]", &no_red)]).unwrap();
        assert_eq!(house_ids(&result[0]), ["h1", "h3"]);
        assert!(result[1]["houses"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_modify_prunes_by_deep_attribute() {
        let no_rotten = Query::parse(&json!({"$not": {"boxes.status": "rotten"}})).unwrap();
        let result = flat_modify(&villages(), &[("houses[*]", &no_rotten)]).unwrap();
        assert_eq!(house_ids(&result[0]), ["h1", "h3"]);
    }

    #[test]
    fn test_modify_recurses_through_chained_wildcards() {
        // The house stays; only its rotten boxes are removed.
        let no_rotten = Query::parse(&json!({"$not": {"status": "rotten"}})).unwrap();
        let result = flat_modify(&villages(), &[("houses[*].boxes[*]", &no_rotten)]).unwrap();
        assert_eq!(house_ids(&result[0]), ["h1", "h2", "h3"]);
        let h2_boxes = result[0]["houses"][1]["boxes"].as_array().unwrap();
        assert!(h2_boxes.is_empty());
    }

    #[test]
    fn test_modify_skips_elements_without_the_array() {
        let any = Query::new();
        let data = json!([{"houses": [{"id": "h1"}]}, {"name": "no houses"}]);
        let result = flat_modify(&data, &[("houses[*]", &any)]).unwrap();
        assert_eq!(result[1], json!({"name": "no houses"}));
    }

    #[test]
    fn test_modify_rejects_rule_without_wildcard() {
        let any = Query::new();
        let err = flat_modify(&villages(), &[("houses", &any)]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("[*]"));
    }

    #[test]
    fn test_modify_rejects_non_array_data() {
        let any = Query::new();
        let err = flat_modify(&json!({"a": 1}), &[("houses[*]", &any)]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_modify_never_mutates_input() {
        let data = villages();
        let copy = data.clone();
        let no_red = Query::parse(&json!({"$not": {"color": "red"}})).unwrap();
        let _ = flat_modify(&data, &[("houses[*]", &no_red)]).unwrap();
        assert_eq!(data, copy);
    }

    #[test]
    fn test_transform_exact_path() {
        let data = json!({"stats": {"score": 10}});
        let double = |v: &Value| json!(v.as_f64().unwrap_or_default() * 2.0);
        let result = flat_transform(&data, &[("stats.score", &double)]);
        assert_eq!(result["stats"]["score"], json!(20.0));
    }

    #[test]
    fn test_transform_wildcard_path() {
        let data = json!({"items": [{"p": 10}, {"p": 20}], "other": 1});
        let bump = |v: &Value| json!(v.as_i64().unwrap_or_default() + 5);
        let result = flat_transform(&data, &[("items[*].p", &bump)]);
        assert_eq!(result["items"][0]["p"], json!(15));
        assert_eq!(result["items"][1]["p"], json!(25));
        assert_eq!(result["other"], json!(1));
    }

    #[test]
    fn test_transform_missing_path_is_ignored() {
        let data = json!({"a": 1});
        let nil = |_: &Value| Value::Null;
        assert_eq!(flat_transform(&data, &[("zzz", &nil)]), data);
    }
}
