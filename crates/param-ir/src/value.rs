//! Value types for request parameters

use crate::file::FileHandle;
use std::collections::BTreeMap;

/// Ordered-key mapping of parameter names to values.
pub type Map = BTreeMap<String, Value>;

/// A dynamically-typed request value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null / absent payload
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    Integer(i64),

    /// 64-bit floating point
    Float(f64),

    /// String value
    String(String),

    /// Raw bytes
    Binary(Vec<u8>),

    /// Nested mapping
    Map(Map),

    /// Sequence of values
    Seq(Vec<Value>),

    /// Uploaded file
    File(FileHandle),
}

impl Value {
    /// Check if value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Semantically empty: null, empty string/binary, empty map or sequence.
    ///
    /// Numbers, booleans and file handles are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Binary(b) => b.is_empty(),
            Value::Map(m) => m.is_empty(),
            Value::Seq(s) => s.is_empty(),
            Value::Bool(_) | Value::Integer(_) | Value::Float(_) | Value::File(_) => false,
        }
    }

    /// String representation of scalar values.
    ///
    /// Returns `None` for null, structured values, file handles and binary
    /// payloads that are not valid UTF-8.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Binary(bytes) => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Value::Null | Value::Map(_) | Value::Seq(_) | Value::File(_) => None,
        }
    }

    /// Borrow the inner string, if this is a string value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the inner mapping, if this is a map
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Mutably borrow the inner mapping, if this is a map
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the file handle, if this is an uploaded file
    #[must_use]
    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            Value::File(f) => Some(f),
            _ => None,
        }
    }

    /// Whether the value is a structured document (map or sequence)
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Value::Map(_) | Value::Seq(_))
    }

    /// Short variant name used in diagnostics
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Map(_) => "map",
            Value::Seq(_) => "seq",
            Value::File(_) => "file",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Seq(v)
    }
}

impl From<FileHandle> for Value {
    fn from(v: FileHandle) -> Self {
        Value::File(v)
    }
}
