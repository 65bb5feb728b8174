//! Request-scoped value access by key path

use crate::{Error, Result};
use param_ir::{Map, Value};

/// Generic get/take/set access to request-scoped values.
///
/// Paths are slices of map keys; `["request", "method"]` addresses
/// `root.request.method`. How the values got there (query string, form
/// body, multipart upload) is the runtime's business.
pub trait Context {
    /// Borrow the value at `path`
    fn get(&self, path: &[&str]) -> Option<&Value>;

    /// Remove the value at `path` and hand over ownership
    fn take(&mut self, path: &[&str]) -> Option<Value>;

    /// Store `value` at `path`, creating intermediate mappings
    ///
    /// # Errors
    ///
    /// Fails when an intermediate value exists and is not a mapping.
    fn set(&mut self, path: &[&str], value: Value) -> Result<()>;
}

/// In-memory context over a single root value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapContext {
    root: Value,
}

impl MapContext {
    /// Empty context
    pub fn new() -> Self {
        Self {
            root: Value::Map(Map::new()),
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_inner(self) -> Value {
        self.root
    }
}

impl From<Value> for MapContext {
    fn from(root: Value) -> Self {
        Self { root }
    }
}

impl From<Map> for MapContext {
    fn from(root: Map) -> Self {
        Self {
            root: Value::Map(root),
        }
    }
}

impl Context for MapContext {
    fn get(&self, path: &[&str]) -> Option<&Value> {
        self.root.get_path(path)
    }

    fn take(&mut self, path: &[&str]) -> Option<Value> {
        self.root.take_path(path)
    }

    fn set(&mut self, path: &[&str], value: Value) -> Result<()> {
        self.root
            .set_path(path, value)
            .map_err(|e| Error::context("set", path.join("/"), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut ctx = MapContext::new();
        ctx.set(&["request", "method"], Value::from("POST")).unwrap();
        assert_eq!(ctx.get(&["request", "method"]), Some(&Value::from("POST")));
        assert!(ctx.get(&["request", "missing"]).is_none());
    }

    #[test]
    fn test_take_removes() {
        let mut ctx = MapContext::new();
        ctx.set(&["input"], Value::Integer(1)).unwrap();
        assert_eq!(ctx.take(&["input"]), Some(Value::Integer(1)));
        assert_eq!(ctx.take(&["input"]), None);
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut ctx = MapContext::new();
        ctx.set(&["request"], Value::from("flat")).unwrap();
        let error = ctx.set(&["request", "method"], Value::from("GET")).unwrap_err();
        assert!(matches!(error, Error::Context { ref path, .. } if path == "request/method"));
    }
}
