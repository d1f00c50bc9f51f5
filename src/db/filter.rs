use serde_json::Value;
use std::cmp::Ordering;

use super::Document;

/// Query predicate over document fields.
///
/// Equality and membership against `null` also match documents where the
/// field is absent, so "unassigned" and "never set" are treated alike.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Eq(String, Value),
    In(String, Vec<Value>),
    /// Half-open string range: `start <= field < end`.
    Range {
        field: String,
        start: String,
        end: String,
    },
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(field.to_string(), value.into())
    }

    pub fn one_of(field: &str, values: Vec<Value>) -> Self {
        Filter::In(field.to_string(), values)
    }

    pub fn range(field: &str, start: impl Into<String>, end: impl Into<String>) -> Self {
        Filter::Range {
            field: field.to_string(),
            start: start.into(),
            end: end.into(),
        }
    }

    /// Conjunction that collapses to `All` when no clause was given.
    pub fn all_of(mut clauses: Vec<Filter>) -> Self {
        clauses.retain(|c| *c != Filter::All);
        match clauses.len() {
            0 => Filter::All,
            1 => clauses.remove(0),
            _ => Filter::And(clauses),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => value_matches(document.get(field), value),
            Filter::In(field, values) => values
                .iter()
                .any(|value| value_matches(document.get(field), value)),
            Filter::Range { field, start, end } => match document.get(field) {
                Some(Value::String(s)) => s.as_str() >= start.as_str() && s.as_str() < end.as_str(),
                _ => false,
            },
            Filter::And(clauses) => clauses.iter().all(|c| c.matches(document)),
        }
    }
}

fn value_matches(actual: Option<&Value>, expected: &Value) -> bool {
    match (actual, expected) {
        (None, Value::Null) => true,
        (Some(actual), expected) => actual == expected,
        (None, _) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn desc(field: &str) -> Self {
        Sort {
            field: field.to_string(),
            order: SortOrder::Descending,
        }
    }

    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ordering = compare_values(a.get(&self.field), b.get(&self.field));
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

// Follows jsonb ordering: missing and null lowest, then strings, numbers,
// booleans, arrays, objects.
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::String(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::Bool(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        _ => match type_rank(a).cmp(&type_rank(b)) {
            Ordering::Equal => match (a, b) {
                (Some(a), Some(b)) if type_rank(Some(a)) >= 4 => a.to_string().cmp(&b.to_string()),
                _ => Ordering::Equal,
            },
            other => other,
        },
    }
}
