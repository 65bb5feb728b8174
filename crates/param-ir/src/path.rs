//! Key-path navigation through nested mappings
//!
//! A key path is a slice of map keys, e.g. `["request", "method"]`. An empty
//! path addresses the value itself.

use crate::value::{Map, Value};
use crate::{Error, Result};

fn display_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

impl Value {
    /// Borrow the value at `path`, if every step is a map containing the key
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let mut current = self;
        for key in path {
            current = match current {
                Value::Map(map) => map.get(key.as_ref())?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Mutably borrow the value at `path`
    pub fn get_path_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Value> {
        let mut current = self;
        for key in path {
            current = match current {
                Value::Map(map) => map.get_mut(key.as_ref())?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Store `value` at `path`, creating intermediate maps where the path
    /// runs through nulls or missing keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if an intermediate value exists but is
    /// not a map.
    pub fn set_path<S: AsRef<str>>(&mut self, path: &[S], value: Value) -> Result<()> {
        let Some((last, parents)) = path.split_last() else {
            *self = value;
            return Ok(());
        };

        let mut current = self;
        for key in parents {
            if current.is_null() {
                *current = Value::Map(Map::new());
            }
            current = match current {
                Value::Map(map) => map.entry(key.as_ref().to_owned()).or_default(),
                other => {
                    return Err(Error::invalid_path(
                        display_path(path),
                        format!("'{}' is a {}, not a map", key.as_ref(), other.type_name()),
                    ));
                }
            };
        }

        if current.is_null() {
            *current = Value::Map(Map::new());
        }
        match current {
            Value::Map(map) => {
                map.insert(last.as_ref().to_owned(), value);
                Ok(())
            }
            other => Err(Error::invalid_path(
                display_path(path),
                format!("parent of '{}' is a {}, not a map", last.as_ref(), other.type_name()),
            )),
        }
    }

    /// Remove and return the value at `path`
    pub fn take_path<S: AsRef<str>>(&mut self, path: &[S]) -> Option<Value> {
        let Some((last, parents)) = path.split_last() else {
            return Some(std::mem::take(self));
        };
        self.get_path_mut(parents)?
            .as_map_mut()?
            .remove(last.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Value {
        let mut inner = Map::new();
        inner.insert("method".to_string(), Value::from("POST"));
        let mut root = Map::new();
        root.insert("request".to_string(), Value::Map(inner));
        Value::Map(root)
    }

    #[test]
    fn test_get_path() {
        let root = request();
        assert_eq!(
            root.get_path(&["request", "method"]),
            Some(&Value::from("POST"))
        );
        assert!(root.get_path(&["request", "missing"]).is_none());
        assert!(root.get_path(&["request", "method", "deeper"]).is_none());
        assert_eq!(root.get_path::<&str>(&[]), Some(&root));
    }

    #[test]
    fn test_set_path_creates_intermediate_maps() {
        let mut root = Value::Null;
        root.set_path(&["input", "name"], Value::from("alice"))
            .unwrap();
        assert_eq!(
            root.get_path(&["input", "name"]),
            Some(&Value::from("alice"))
        );
    }

    #[test]
    fn test_set_path_through_scalar_fails() {
        let mut root = request();
        let error = root
            .set_path(&["request", "method", "x"], Value::Null)
            .unwrap_err();
        assert!(matches!(error, Error::InvalidPath { ref path, .. } if path == "request/method/x"));
    }

    #[test]
    fn test_take_path() {
        let mut root = request();
        assert_eq!(
            root.take_path(&["request", "method"]),
            Some(Value::from("POST"))
        );
        assert!(root.get_path(&["request", "method"]).is_none());
        assert!(root.take_path(&["nope"]).is_none());
    }

    #[test]
    fn test_get_path_mut() {
        let mut root = request();
        if let Some(method) = root.get_path_mut(&["request", "method"]) {
            *method = Value::from("PUT");
        }
        assert_eq!(
            root.get_path(&["request", "method"]),
            Some(&Value::from("PUT"))
        );
    }
}
