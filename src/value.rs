//! Loosely-typed template arguments and their text coercion.
//!
//! Template engines pass helper arguments as dynamic values. [`Value`] is the
//! closed set of shapes we accept, and [`Value::to_text`] is the single place
//! that decides how each shape becomes a command-line string.
//!
//! # Coercion rules
//!
//! | Value            | Text                                   |
//! |------------------|----------------------------------------|
//! | `Null`           | empty string                           |
//! | `Bool`           | `true` / `false`                       |
//! | `Int`, `UInt`    | decimal                                |
//! | `Float`          | shortest decimal, no exponent          |
//! | `Text`, `Html`   | unchanged                              |
//! | `Bytes`          | unchanged if valid UTF-8, else error   |
//! | `List`, `Map`    | error                                  |

use crate::error::{ExecError, Result};
use crate::markup::SafeHtml;
use std::collections::BTreeMap;

/// A single template function argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Html(SafeHtml),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Html(_) => "html",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Coerce the value to text.
    ///
    /// Returns `ExecError::Argument` for lists, maps, and byte strings that
    /// are not valid UTF-8.
    pub fn to_text(&self) -> Result<String> {
        match self {
            Value::Null => Ok(String::new()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Int(n) => Ok(n.to_string()),
            Value::UInt(n) => Ok(n.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Text(s) => Ok(s.clone()),
            Value::Html(h) => Ok(h.as_str().to_string()),
            Value::Bytes(bytes) => String::from_utf8(bytes.clone()).map_err(|e| {
                ExecError::Argument(format!("byte string is not valid UTF-8: {}", e))
            }),
            Value::List(_) | Value::Map(_) => Err(ExecError::Argument(format!(
                "unable to convert {} to string",
                self.kind()
            ))),
        }
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInt(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<SafeHtml> for Value {
    fn from(html: SafeHtml) -> Self {
        Value::Html(html)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    // Finite JSON numbers always fit in f64.
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}
