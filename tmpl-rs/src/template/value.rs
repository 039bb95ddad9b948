//! Runtime value type for the template language.
//!
//! Actions compute scalars: strings, numbers, booleans, and nil.  Host data
//! enters as JSON; scalar JSON values are converted on access, while objects
//! and arrays travel as [`Value::Data`] so they can serve as the dot of a
//! `with` block or be walked with `.field` selectors.

use std::cmp::Ordering;
use std::fmt;

use super::error::{Error, Result};

/// A template runtime value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Str(String),
    Number(f64),
    Bool(bool),
    /// A non-scalar host value (JSON object or array).
    Data(serde_json::Value),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("<nil>"),
            Value::Str(s) => f.write_str(s),
            // f64's Display is already the shortest round-trip form: 23, 2.5, -7.
            Value::Number(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Data(d) => write!(f, "{d}"),
        }
    }
}

impl Value {
    /// The emptiness test used by `and`, `or`, and `not`.
    ///
    /// Only `false`, `0`, nil, and `""` are empty; host objects and arrays
    /// never are.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Str(s) => s.is_empty(),
            Value::Number(x) => *x == 0.0,
            Value::Bool(b) => !b,
            Value::Data(_) => false,
        }
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Name of the value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Str(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Data(serde_json::Value::Array(_)) => "array",
            Value::Data(_) => "object",
        }
    }

    /// Natural ordering: numbers numerically, strings lexicographically.
    ///
    /// Returns `None` for any other pairing (mixed kinds, nil, booleans,
    /// host data, or NaN).
    pub fn compare(&self, rhs: &Value) -> Option<Ordering> {
        match (self, rhs) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Look up one field of this value.
    pub fn field(&self, name: &str) -> Result<Value> {
        match self {
            Value::Data(serde_json::Value::Object(map)) => {
                map.get(name).map(Value::from).ok_or_else(|| Error::FieldAccess {
                    field: name.to_owned(),
                    message: "no such key".into(),
                })
            }
            other => Err(Error::FieldAccess {
                field: name.to_owned(),
                message: format!("{} value has no fields", other.kind()),
            }),
        }
    }

    /// Walk a dotted path (`"a.b.c"`).  The empty path is the value itself.
    pub fn walk(&self, path: &str) -> Result<Value> {
        if path.is_empty() {
            return Ok(self.clone());
        }
        let mut segments = path.split('.');
        // split() always yields at least one segment.
        let first = segments.next().unwrap_or_default();
        segments.try_fold(self.field(first)?, |cur, seg| cur.field(seg))
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Value::Str(s.clone()),
            composite => Value::Data(composite.clone()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Value::Str(s),
            composite => Value::Data(composite),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
