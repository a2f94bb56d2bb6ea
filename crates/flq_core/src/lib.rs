//! flq_core - flat-path representation and declarative query matching for
//! nested JSON values.
//!
//! Two tightly coupled pieces: the bidirectional mapping between a nested
//! value and a flat mapping of dotted/bracketed path strings to leaves
//! ([`flatten`] / [`deflatten`]), and a matching engine ([`flat_filter`])
//! whose paths tunnel through arrays they cross without a concrete index.
//! Layered on top: rule-driven pruning ([`flat_modify`]), leaf transforms
//! ([`flat_transform`]), selection ([`flat_pick`] / [`flat_omit`]),
//! renaming ([`rename`]) and a lazy pipeline ([`flat_chain`]).
//!
//! ```
//! use flq_core::{deflatten, flat_filter, flatten, Query};
//! use serde_json::json;
//!
//! let person = json!({
//!     "name": "John",
//!     "address": {"coordinates": {"lat": 40.7128}},
//!     "hobbies": ["reading", "swimming"]
//! });
//! let flat = flatten(&person);
//! assert_eq!(flat.get("address.coordinates.lat"), Some(&json!(40.7128)));
//! assert_eq!(flat.get("hobbies[0]"), Some(&json!("reading")));
//! assert_eq!(deflatten(&flat), person);
//!
//! let crates = json!([
//!     {"id": 1, "boxes": [{"apples": [{"status": "fresh"}]}]},
//!     {"id": 2, "boxes": [{"apples": [{"status": "rotten"}]}]}
//! ]);
//! let rotten = Query::parse(&json!({"boxes.apples.status": "rotten"}))?;
//! assert_eq!(flat_filter(&crates, &rotten)?.len(), 1);
//! # Ok::<(), flq_core::Error>(())
//! ```
//!
//! Every operation is synchronous and pure; recursion depth is bounded by
//! the input's nesting depth, which is the caller's responsibility for
//! adversarial inputs.

pub mod chain;
pub mod deflatten;
pub mod filter;
pub mod flatten;
pub mod modify;
pub mod path;
pub mod query;
pub mod rename;
mod resolve;
pub mod select;

use serde_json::Value;

pub use chain::{Chain, flat_chain};
pub use deflatten::{deflatten, deflatten_json, deflatten_to_json};
pub use filter::flat_filter;
pub use flatten::{FlatMap, flatten, flatten_json, flatten_with_prefix};
pub use modify::{flat_modify, flat_transform};
pub use query::{Constraint, Expected, Query};
pub use rename::rename;
pub use select::{flat_omit, flat_pick};

/// Error type for flq operations.
///
/// Everything inside the matching algebra (missing paths, empty tunnels,
/// type mismatches in a constraint) is an ordinary non-match, never an
/// error; only malformed serialized input and wrongly-shaped arguments
/// surface here.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed serialized input; `op` names the failing operation.
    Parse { op: &'static str, message: String },
    /// An argument had the wrong shape for the operation.
    InvalidArgument(String),
}

impl Error {
    pub(crate) fn parse(op: &'static str, err: &serde_json::Error) -> Self {
        Error::Parse {
            op,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse { op, message } => {
                write!(f, "invalid input provided to {op}: {message}")
            }
            Error::InvalidArgument(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for Error {}

/// Parse a JSON query and apply it to a JSON array, in one call.
///
/// # Example
/// ```
/// use flq_core::filter_json;
///
/// let kept = filter_json(
///     r#"{"details.condition": "good"}"#,
///     r#"[{"details": {"condition": "good"}}, {"details": {"condition": "bad"}}]"#,
/// )?;
/// assert_eq!(kept.len(), 1);
/// # Ok::<(), flq_core::Error>(())
/// ```
pub fn filter_json(query: &str, data: &str) -> Result<Vec<Value>, Error> {
    let query_value: Value = serde_json::from_str(query).map_err(|e| Error::parse("filter", &e))?;
    let data_value: Value = serde_json::from_str(data).map_err(|e| Error::parse("filter", &e))?;
    let compiled = Query::parse(&query_value)?;
    flat_filter(&data_value, &compiled)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_json_end_to_end() {
        let kept = filter_json(
            r#"{"boxes.apples.status": "rotten"}"#,
            r#"[
                {"id": 1, "boxes": [{"apples": [{"status": "fresh"}]}]},
                {"id": 2, "boxes": [{"apples": [{"status": "rotten"}]}]}
            ]"#,
        )
        .unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0]["id"], 2);
    }

    #[test]
    fn test_filter_json_invalid_query_text() {
        let err = filter_json("nope", "[]").unwrap_err();
        assert!(matches!(err, Error::Parse { op: "filter", .. }));
    }

    #[test]
    fn test_filter_json_non_array_data() {
        let err = filter_json("{}", "{}").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_error_display_names_operation() {
        let err = flatten_json("x", "").unwrap_err();
        assert!(
            err.to_string()
                .starts_with("invalid input provided to flatten")
        );
    }

    #[test]
    fn test_round_trip_with_non_empty_containers() {
        let original = json!({
            "a": {"b": [1, {"c": [true, null]}]},
            "d": "leaf"
        });
        assert_eq!(deflatten(&flatten(&original)), original);
    }
}
