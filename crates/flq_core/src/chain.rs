//! Lazy multi-step filter pipeline.

use crate::filter::matches;
use crate::query::Query;
use serde_json::Value;

/// A pipeline of filter steps over a value sequence.
///
/// Steps accumulate lazily; nothing runs until [`Chain::value`]. Several
/// steps are merged into a single `$and` query so the data is traversed only
/// once, and a pipeline with no steps hands back the input vector untouched.
///
/// # Example
/// ```
/// use flq_core::{Query, flat_chain};
/// use serde_json::json;
///
/// let inventory = vec![
///     json!({"type": "fruit", "details": {"condition": "good"}}),
///     json!({"type": "fruit", "details": {"condition": "bad"}}),
///     json!({"type": "veg", "details": {"condition": "good"}}),
/// ];
/// let kept = flat_chain(inventory)
///     .filter(Query::new().field("type", "fruit"))
///     .filter(Query::new().field("details.condition", "good"))
///     .value();
/// assert_eq!(kept.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Chain {
    data: Vec<Value>,
    queries: Vec<Query>,
}

/// Start a pipeline over `data`.
pub fn flat_chain(data: Vec<Value>) -> Chain {
    Chain {
        data,
        queries: Vec::new(),
    }
}

impl Chain {
    /// Add a filter step. Lazy: nothing is evaluated here.
    #[must_use]
    pub fn filter(mut self, query: Query) -> Self {
        self.queries.push(query);
        self
    }

    /// Execute the pipeline.
    pub fn value(mut self) -> Vec<Value> {
        let query = match self.queries.len() {
            0 => return self.data,
            1 => self.queries.remove(0),
            _ => Query::new().and(self.queries),
        };
        self.data
            .into_iter()
            .filter(|item| matches(item, &query))
            .collect()
    }
}
