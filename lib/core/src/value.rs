//! Raw cell values and missing-value filtering
//!
//! Columns arrive from the table adapter as loosely typed values. Before any
//! statistic is computed, missing entries (`null`, empty strings, `"NA"` in
//! any case, `NaN`) are removed, either per sample or pairwise.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single raw cell
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged, from = "serde_json::Value")]
pub enum Value {
    Missing,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(n) => n.is_nan(),
            Value::Text(s) => {
                let s = s.trim();
                s.is_empty() || s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("nan")
            }
        }
    }

    /// Finite numeric reading of the value; numeric text is parsed
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
            Value::Missing => return None,
        };
        n.is_finite().then_some(n)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Missing, Value::Missing) => true,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Missing => {}
            Value::Number(n) => n.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => f.write_str("NA"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Missing),
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Text(other.to_string()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

/// Build a column from anything convertible into values
pub fn column<T: Into<Value>, I: IntoIterator<Item = T>>(items: I) -> Vec<Value> {
    items.into_iter().map(Into::into).collect()
}

/// Non-missing values of one sample
pub fn present(values: &[Value]) -> Vec<&Value> {
    values.iter().filter(|v| !v.is_missing()).collect()
}

/// Finite numbers of one sample; missing and non-numeric entries are dropped
pub fn numbers(values: &[Value]) -> Vec<f64> {
    values.iter().filter_map(Value::as_f64).collect()
}

/// Pairs where neither side is missing
pub fn paired<'a>(a: &'a [Value], b: &'a [Value]) -> Vec<(&'a Value, &'a Value)> {
    a.iter()
        .zip(b.iter())
        .filter(|(x, y)| !x.is_missing() && !y.is_missing())
        .collect()
}

/// Pairs where both sides are finite numbers
pub fn paired_numbers(a: &[Value], b: &[Value]) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .unzip()
}

/// True when every non-missing value reads as a number
pub fn is_numeric(values: &[Value]) -> bool {
    values
        .iter()
        .filter(|v| !v.is_missing())
        .all(|v| v.as_f64().is_some())
}
