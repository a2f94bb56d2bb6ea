//! Predicate matching and query application.

use crate::Error;
use crate::query::{Constraint, Expected, PathConstraint, Query};
use crate::resolve::{Resolved, resolve};
use serde_json::Value;

/// Keep, in original order, the elements of `data` matching `query`.
///
/// `data` must be an array; anything else is an [`Error::InvalidArgument`].
/// The input and the query are never mutated.
///
/// # Example
/// ```
/// use flq_core::{Query, flat_filter};
/// use serde_json::json;
///
/// let crates = json!([
///     {"id": 1, "boxes": [{"apples": [{"status": "fresh"}]}]},
///     {"id": 2, "boxes": [{"apples": [{"status": "rotten"}]}]}
/// ]);
/// let rotten = Query::parse(&json!({"boxes.apples.status": "rotten"}))?;
/// let kept = flat_filter(&crates, &rotten)?;
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0]["id"], 2);
/// # Ok::<(), flq_core::Error>(())
/// ```
pub fn flat_filter(data: &Value, query: &Query) -> Result<Vec<Value>, Error> {
    let Value::Array(items) = data else {
        return Err(Error::invalid(
            "flat_filter expects an array as its first argument",
        ));
    };
    Ok(items
        .iter()
        .filter(|item| matches(item, query))
        .cloned()
        .collect())
}

/// Evaluate `query` against one candidate.
///
/// Order: `$and` (all, short-circuit), `$or` (any, short-circuit), `$not`
/// (negation), then literal constraints in source order. Empty combinator
/// lists impose no constraint. Literal keys are each independently
/// existential across tunnels; only `$elemMatch` correlates conditions
/// within one array element.
pub(crate) fn matches(candidate: &Value, query: &Query) -> bool {
    if !query.and.is_empty() && !query.and.iter().all(|sub| matches(candidate, sub)) {
        return false;
    }
    if !query.or.is_empty() && !query.or.iter().any(|sub| matches(candidate, sub)) {
        return false;
    }
    if let Some(negated) = &query.not {
        if matches(candidate, negated) {
            return false;
        }
    }
    query
        .constraints
        .iter()
        .all(|constraint| constraint_holds(candidate, constraint))
}

fn constraint_holds(candidate: &Value, constraint: &PathConstraint) -> bool {
    let resolved = resolve(candidate, &constraint.path);
    match &constraint.constraint {
        Constraint::ElemMatch(sub) => match resolved {
            // The path must address an actual array in the candidate; a
            // tunneled sequence is not a correlation domain.
            Resolved::Single(Value::Array(items)) => items.iter().any(|item| matches(item, sub)),
            _ => false,
        },
        Constraint::Equals(expected) => equals(&resolved, expected),
    }
}

fn equals(resolved: &Resolved<'_>, expected: &Expected) -> bool {
    match (resolved, expected) {
        (Resolved::Single(actual), Expected::Value(want)) => *actual == want,
        (Resolved::Single(_), Expected::Absent) => false,
        (Resolved::Multi(entries), Expected::Value(want)) => {
            // Membership across a tunnel is scalar-only; a container on the
            // right-hand side never matches tunnel output.
            is_scalar(want) && entries.iter().any(|entry| matches!(entry, Some(v) if *v == want))
        }
        (Resolved::Multi(entries), Expected::Absent) => entries.iter().any(Option::is_none),
        (Resolved::Missing, Expected::Absent) => true,
        (Resolved::Missing, Expected::Value(_)) => false,
    }
}

fn is_scalar(value: &Value) -> bool {
    !(value.is_array() || value.is_object())
}
