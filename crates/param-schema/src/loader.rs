//! Schema loader
//!
//! Reads schema definitions from JSON or YAML text, from files, or from an
//! already-decoded configuration [`Value`]. The definition may be a bare
//! schema (`method`, `fields`) or a step configuration holding the schema
//! under a section key (`input` by default).

use crate::model::{Bound, ERRNO_INPUT, FieldSpec, FieldType, Schema};
use crate::{Error, Result};
use param_ir::decode::decode;
use param_ir::{Format, Value};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// Section of a step configuration that holds the schema
pub const DEFAULT_SECTION: &str = "input";

/// Serializable schema format for loading from configuration
#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    fields: Vec<FieldFile>,
}

/// Serializable field format. Loosely-typed attributes are read as
/// [`Value`] and converted permissively, the way request data is.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldFile {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    field_type: Option<String>,
    #[serde(default)]
    required: Option<Value>,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    min_value: Option<Value>,
    #[serde(default)]
    max_value: Option<Value>,
    #[serde(default)]
    errno: Option<Value>,
    #[serde(default)]
    errmsg: Option<String>,
}

/// Loader for input schemas
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    section: String,
}

impl SchemaLoader {
    /// Create a loader reading step configurations from the `input` section
    pub fn new() -> Self {
        Self {
            section: DEFAULT_SECTION.to_string(),
        }
    }

    /// Use a different step-configuration section
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// Load a schema from a file; `.yaml`/`.yml` are YAML, anything else JSON.
    /// The file stem becomes the schema name.
    pub fn load_from_file(&self, path: &Path) -> Result<Schema> {
        trace!("Loading schema from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let format = Format::from_extension(path.extension().and_then(|e| e.to_str()));
        let schema = self.load_from_str(format, &content)?;

        Ok(match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => schema.with_name(stem),
            None => schema,
        })
    }

    /// Load a schema from JSON string
    pub fn load_from_json(&self, json: &str) -> Result<Schema> {
        self.load_from_str(Format::Json, json)
    }

    /// Load a schema from YAML string
    pub fn load_from_yaml(&self, yaml: &str) -> Result<Schema> {
        self.load_from_str(Format::Yaml, yaml)
    }

    fn load_from_str(&self, format: Format, text: &str) -> Result<Schema> {
        let value = decode(format, text)?;
        self.load_from_value(&value)
    }

    /// Load a schema from a decoded configuration value.
    ///
    /// Unknown attributes are ignored and missing ones take their defaults.
    /// Field names must be present and unique, and every pattern must
    /// compile; the schema's pattern cache is warm on return.
    pub fn load_from_value(&self, config: &Value) -> Result<Schema> {
        let definition = self.resolve_section(config)?;
        if definition.is_null() {
            debug!("Empty schema configuration");
            return Ok(Schema::new());
        }
        check_finite_bounds(definition)?;
        let json = serde_json::to_value(definition)
            .map_err(|e| Error::InvalidFormat(format!("unrepresentable schema: {e}")))?;
        let schema_file: SchemaFile = serde_json::from_value(json)
            .map_err(|e| Error::InvalidFormat(format!("schema parse error: {e}")))?;

        let schema = convert_schema_file(schema_file)?;
        schema.compile_patterns()?;

        info!(
            method = schema.method().unwrap_or("*"),
            fields = schema.len(),
            patterns = schema.patterns().len(),
            "Loaded input schema"
        );
        Ok(schema)
    }

    /// Pick the schema out of a step configuration, or use the value itself
    /// when it already looks like a bare schema.
    fn resolve_section<'a>(&self, config: &'a Value) -> Result<&'a Value> {
        let Some(map) = config.as_map() else {
            return match config {
                Value::Null => Ok(config),
                other => Err(Error::InvalidFormat(format!(
                    "schema must be a mapping, found {}",
                    other.type_name()
                ))),
            };
        };

        if map.contains_key("fields") || map.contains_key("method") {
            return Ok(config);
        }

        match map.get(&self.section) {
            Some(section @ Value::Map(_)) => {
                debug!(section = %self.section, "Using schema from step configuration section");
                Ok(section)
            }
            Some(other) => Err(Error::InvalidFormat(format!(
                "section '{}' must be a mapping, found {}",
                self.section,
                other.type_name()
            ))),
            None => Ok(config),
        }
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a SchemaFile to a Schema
fn convert_schema_file(schema_file: SchemaFile) -> Result<Schema> {
    let mut schema = Schema::new();
    if let Some(method) = schema_file.method {
        schema = schema.with_method(method);
    }

    let mut seen = HashSet::new();
    for (index, field) in schema_file.fields.into_iter().enumerate() {
        if field.name.is_empty() {
            return Err(Error::InvalidFormat(format!(
                "field #{index} has no name"
            )));
        }
        if !seen.insert(field.name.clone()) {
            return Err(Error::DuplicateField(field.name));
        }
        schema = schema.add_field(convert_field(field)?);
    }

    Ok(schema)
}

fn convert_field(field: FieldFile) -> Result<FieldSpec> {
    let field_type = match field.field_type.as_deref() {
        None => FieldType::String,
        Some(name) => name.parse().unwrap_or_else(|_| {
            warn!(
                field = %field.name,
                field_type = name,
                "Unknown field type, treating as string"
            );
            FieldType::String
        }),
    };

    let errno = match &field.errno {
        None | Some(Value::Null) => ERRNO_INPUT,
        Some(value) => value
            .to_i64()
            .ok()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| {
                Error::InvalidFormat(format!("field '{}': errno must be an integer", field.name))
            })?,
    };

    let min_value = convert_bound(&field.name, "minValue", field.min_value.as_ref())?;
    let max_value = convert_bound(&field.name, "maxValue", field.max_value.as_ref())?;

    Ok(FieldSpec {
        required: field.required.as_ref().is_some_and(Value::to_bool),
        field_type,
        pattern: field.pattern.filter(|p| !p.is_empty()),
        min_value,
        max_value,
        errno,
        errmsg: field.errmsg,
        name: field.name,
    })
}

/// JSON has no NaN or infinity, so non-finite bounds must be rejected
/// before the definition is bridged through `serde_json`.
fn check_finite_bounds(definition: &Value) -> Result<()> {
    let Some(Value::Seq(fields)) = definition.get_path(&["fields"]) else {
        return Ok(());
    };
    for field in fields {
        for attribute in ["minValue", "maxValue"] {
            if matches!(field.get_path(&[attribute]), Some(Value::Float(f)) if !f.is_finite()) {
                let name = field
                    .get_path(&["name"])
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                return Err(Error::InvalidFormat(format!(
                    "field '{name}': {attribute} must be a finite number"
                )));
            }
        }
    }
    Ok(())
}

fn convert_bound(field: &str, attribute: &str, value: Option<&Value>) -> Result<Option<Bound>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Bound::from_value(value).map(Some).ok_or_else(|| {
            Error::InvalidFormat(format!("field '{field}': {attribute} must be a number"))
        }),
    }
}
