//! Step configuration

use crate::{Error, Result};
use param_ir::Value;
use serde::{Deserialize, Serialize};

fn default_input_path() -> Vec<String> {
    vec!["input".to_string()]
}

fn default_method_path() -> Vec<String> {
    vec!["request".to_string(), "method".to_string()]
}

fn default_method() -> String {
    "GET".to_string()
}

/// Where the input step finds its data in the request context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepConfig {
    /// Key path of the input mapping
    #[serde(default = "default_input_path")]
    pub input_path: Vec<String>,
    /// Key path of the request method
    #[serde(default = "default_method_path")]
    pub method_path: Vec<String>,
    /// Method assumed when the context carries none
    #[serde(default = "default_method")]
    pub default_method: String,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            method_path: default_method_path(),
            default_method: default_method(),
        }
    }
}

impl StepConfig {
    /// Read the step settings from a step configuration value. The schema
    /// itself lives alongside them and is ignored here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a setting has the wrong shape.
    pub fn from_value(config: &Value) -> Result<Self> {
        if config.is_null() {
            return Ok(Self::default());
        }
        let json = serde_json::to_value(config)
            .map_err(|e| Error::Config(format!("unrepresentable step configuration: {e}")))?;
        serde_json::from_value(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn input_path(&self) -> Vec<&str> {
        self.input_path.iter().map(String::as_str).collect()
    }

    pub fn method_path(&self) -> Vec<&str> {
        self.method_path.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use param_ir::{Format, decode::decode};

    #[test]
    fn test_defaults() {
        let config = StepConfig::default();
        assert_eq!(config.input_path(), vec!["input"]);
        assert_eq!(config.method_path(), vec!["request", "method"]);
        assert_eq!(config.default_method, "GET");
        assert_eq!(StepConfig::from_value(&Value::Null).unwrap(), config);
    }

    #[test]
    fn test_partial_override_ignores_schema_keys() {
        let value = decode(
            Format::Yaml,
            "inputPath: [body, params]\ninput:\n  fields:\n    - name: q\n",
        )
        .unwrap();
        let config = StepConfig::from_value(&value).unwrap();
        assert_eq!(config.input_path(), vec!["body", "params"]);
        assert_eq!(config.method_path(), vec!["request", "method"]);
    }

    #[test]
    fn test_wrong_shape_is_config_error() {
        let value = decode(Format::Json, r#"{"defaultMethod": ["GET"]}"#).unwrap();
        assert!(matches!(StepConfig::from_value(&value), Err(Error::Config(_))));
    }
}
