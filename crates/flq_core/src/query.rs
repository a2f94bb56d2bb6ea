//! Query model: compiled form of a declarative match expression.

use crate::Error;
use crate::path::{self, Segments};
use serde_json::Value;

const AND: &str = "$and";
const OR: &str = "$or";
const NOT: &str = "$not";
const ELEM_MATCH: &str = "$elemMatch";

/// Expected right-hand side of a literal path constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// Deep equality against a concrete value; `null` is a value here.
    Value(Value),
    /// The path must resolve to nothing: an empty or missing tunnel, or
    /// (through a tunnel) some element that lacks the field. JSON cannot
    /// express this expectation; it is built with [`Query::absent`].
    Absent,
}

/// What a literal path key demands of the candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Equality, with existential membership across tunneled sequences.
    Equals(Expected),
    /// Correlated sub-match: some element of the addressed array must
    /// satisfy the nested query on its own.
    ElemMatch(Query),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PathConstraint {
    pub(crate) path: Segments,
    pub(crate) constraint: Constraint,
}

/// A compiled, immutable query.
///
/// Combinator lists (`$and`, `$or`, `$not`) and literal path constraints may
/// coexist; every present part must hold for a candidate to match. Literal
/// constraints keep their source order. Compile once with [`Query::parse`]
/// (or the builder methods), evaluate many times — evaluation never errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub(crate) and: Vec<Query>,
    pub(crate) or: Vec<Query>,
    pub(crate) not: Option<Box<Query>>,
    pub(crate) constraints: Vec<PathConstraint>,
}

impl Query {
    /// An empty query; it matches everything until constrained.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a query from its JSON object form.
    ///
    /// Reserved keys: `$and`/`$or` hold arrays of queries, `$not` holds one
    /// query, and a constraint value that is an object whose only key is
    /// `$elemMatch` holds a correlated sub-query. Every other key is a flat
    /// path constrained to literal equality with its value.
    ///
    /// # Example
    /// ```
    /// use flq_core::Query;
    /// use serde_json::json;
    ///
    /// let query = Query::parse(&json!({
    ///     "$not": {"houses.boxes.apples.status": "rotten"}
    /// }))?;
    /// # let _ = query;
    /// # Ok::<(), flq_core::Error>(())
    /// ```
    pub fn parse(value: &Value) -> Result<Self, Error> {
        let Value::Object(members) = value else {
            return Err(Error::invalid("query must be a JSON object"));
        };
        let mut query = Query::new();
        for (key, entry) in members {
            match key.as_str() {
                AND => query.and = Self::parse_list(AND, entry)?,
                OR => query.or = Self::parse_list(OR, entry)?,
                NOT => query.not = Some(Box::new(Self::parse(entry)?)),
                _ => query.constraints.push(PathConstraint {
                    path: path::parse(key),
                    constraint: Self::parse_constraint(entry)?,
                }),
            }
        }
        Ok(query)
    }

    fn parse_list(name: &str, value: &Value) -> Result<Vec<Query>, Error> {
        let Value::Array(items) = value else {
            return Err(Error::invalid(format!("{name} expects an array of queries")));
        };
        items.iter().map(Self::parse).collect()
    }

    fn parse_constraint(value: &Value) -> Result<Constraint, Error> {
        if let Value::Object(members) = value {
            if let Some(inner) = members.get(ELEM_MATCH) {
                if members.len() != 1 {
                    return Err(Error::invalid(
                        "$elemMatch cannot be combined with sibling keys",
                    ));
                }
                return Ok(Constraint::ElemMatch(Self::parse(inner)?));
            }
        }
        Ok(Constraint::Equals(Expected::Value(value.clone())))
    }

    /// Require `path` to equal `value` (existential across tunnels).
    pub fn field(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.constraints.push(PathConstraint {
            path: path::parse(path),
            constraint: Constraint::Equals(Expected::Value(value.into())),
        });
        self
    }

    /// Require `path` to resolve to nothing.
    pub fn absent(mut self, path: &str) -> Self {
        self.constraints.push(PathConstraint {
            path: path::parse(path),
            constraint: Constraint::Equals(Expected::Absent),
        });
        self
    }

    /// Require some element of the array at `path` to satisfy `sub` on its
    /// own (conditions correlated within one element).
    pub fn elem_match(mut self, path: &str, sub: Query) -> Self {
        self.constraints.push(PathConstraint {
            path: path::parse(path),
            constraint: Constraint::ElemMatch(sub),
        });
        self
    }

    /// Require every query in `queries` to match.
    pub fn and(mut self, queries: Vec<Query>) -> Self {
        self.and = queries;
        self
    }

    /// Require at least one query in `queries` to match.
    pub fn or(mut self, queries: Vec<Query>) -> Self {
        self.or = queries;
        self
    }

    /// Require `query` not to match.
    pub fn not(mut self, query: Query) -> Self {
        self.not = Some(Box::new(query));
        self
    }
}
