//! Filter and query representation.
//!
//! Filters are built as a small AST instead of string concatenation so the
//! in-memory store can evaluate them structurally while the remote store
//! renders them to the backend's filter-expression syntax (with value
//! escaping). The rendered form matches what the backend expects, e.g.
//! `empresa = "x" && (codigo = "ABC" || codigos_alternativos ~ "ABC")`.

use serde_json::Value;

use super::record::{parse_timestamp, RawRecord};

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    /// Case-insensitive containment: substring on strings, per-element
    /// substring on arrays. Renders as the backend's `~` operator.
    Like,
    Ge,
    Le,
}

impl Op {
    fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Like => "~",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }
}

/// A filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Cond {
        field: String,
        op: Op,
        value: Value,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Cond { field: field.into(), op: Op::Eq, value: value.into() }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Cond { field: field.into(), op: Op::Ne, value: value.into() }
    }

    pub fn like(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Cond { field: field.into(), op: Op::Like, value: value.into() }
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Cond { field: field.into(), op: Op::Ge, value: value.into() }
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Cond { field: field.into(), op: Op::Le, value: value.into() }
    }

    pub fn and(parts: Vec<Filter>) -> Self {
        Self::And(parts)
    }

    pub fn or(parts: Vec<Filter>) -> Self {
        Self::Or(parts)
    }

    /// Render to the backend's filter-expression syntax.
    pub fn render(&self) -> String {
        match self {
            Self::Cond { field, op, value } => {
                format!("{field} {} {}", op.symbol(), render_value(value))
            }
            Self::And(parts) => join_rendered(parts, " && "),
            Self::Or(parts) => join_rendered(parts, " || "),
        }
    }

    /// Evaluate against a record (in-memory store semantics).
    pub fn matches(&self, record: &RawRecord) -> bool {
        match self {
            Self::And(parts) => parts.iter().all(|f| f.matches(record)),
            Self::Or(parts) => parts.iter().any(|f| f.matches(record)),
            Self::Cond { field, op, value } => {
                let actual = record.field(field);
                match op {
                    Op::Eq => actual.as_ref().is_some_and(|a| loose_eq(a, value)),
                    Op::Ne => !actual.as_ref().is_some_and(|a| loose_eq(a, value)),
                    Op::Like => actual.as_ref().is_some_and(|a| contains(a, value)),
                    Op::Ge => compare(actual.as_ref(), value).is_some_and(|o| o.is_ge()),
                    Op::Le => compare(actual.as_ref(), value).is_some_and(|o| o.is_le()),
                }
            }
        }
    }
}

/// A sort key. `descending` renders as the backend's `-` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: false }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: true }
    }
}

/// A full list query: optional filter plus multi-key sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Filter>,
    pub sort: Vec<Sort>,
}

impl Query {
    pub fn filtered(filter: Filter) -> Self {
        Self { filter: Some(filter), sort: Vec::new() }
    }

    pub fn sorted_by(mut self, sort: Vec<Sort>) -> Self {
        self.sort = sort;
        self
    }

    /// Render the sort keys to the backend's `+field,-other` syntax.
    pub fn render_sort(&self) -> String {
        self.sort
            .iter()
            .map(|s| format!("{}{}", if s.descending { "-" } else { "+" }, s.field))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn join_rendered(parts: &[Filter], sep: &str) -> String {
    parts
        .iter()
        .map(|p| match p {
            Filter::Cond { .. } => p.render(),
            group => format!("({})", group.render()),
        })
        .collect::<Vec<_>>()
        .join(sep)
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        other => other.to_string(),
    }
}

/// Equality with numeric coercion: `1` and `1.0` compare equal, everything
/// else uses JSON value equality.
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn contains(haystack: &Value, needle: &Value) -> bool {
    let needle = match needle.as_str() {
        Some(s) => s.to_lowercase(),
        None => needle.to_string(),
    };
    match haystack {
        Value::String(s) => s.to_lowercase().contains(&needle),
        Value::Array(items) => items.iter().any(|item| {
            item.as_str()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
        }),
        _ => false,
    }
}

/// Ordering for range comparisons: numbers numerically, timestamps
/// chronologically when both sides parse, strings lexicographically.
fn compare(actual: Option<&Value>, expected: &Value) -> Option<std::cmp::Ordering> {
    let actual = actual?;
    if let (Some(a), Some(b)) = (actual.as_f64(), expected.as_f64()) {
        return a.partial_cmp(&b);
    }
    let (a, b) = (actual.as_str()?, expected.as_str()?);
    if let (Some(ta), Some(tb)) = (parse_timestamp(a), parse_timestamp(b)) {
        return Some(ta.cmp(&tb));
    }
    Some(a.cmp(b))
}
