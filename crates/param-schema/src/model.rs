//! Schema model definitions

use crate::patterns::PatternCache;
use crate::{Error, Result};
use param_ir::Value;
use std::fmt;
use std::str::FromStr;

/// Generic "invalid input" error number used when a field sets no `errno`.
pub const ERRNO_INPUT: i32 = 400;

/// Error number reported for schema configuration defects.
pub const ERRNO_CONFIG: i32 = 500;

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    /// Accepted as-is
    #[default]
    String,
    /// Signed 32-bit range integer
    Int,
    /// Signed 64-bit integer
    Long,
    /// Permissive boolean
    Bool,
    /// 64-bit float
    Float,
    /// Embedded JSON document
    Json,
    /// Embedded YAML document
    Yaml,
    /// Uploaded file
    File,
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "string" => Ok(FieldType::String),
            "int" | "int32" => Ok(FieldType::Int),
            "long" | "int64" => Ok(FieldType::Long),
            "bool" | "boolean" => Ok(FieldType::Bool),
            "float" | "double" | "number" => Ok(FieldType::Float),
            "json" => Ok(FieldType::Json),
            "yaml" => Ok(FieldType::Yaml),
            "file" => Ok(FieldType::File),
            other => Err(Error::InvalidFormat(format!("unknown field type '{other}'"))),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Int => write!(f, "int"),
            FieldType::Long => write!(f, "long"),
            FieldType::Bool => write!(f, "bool"),
            FieldType::Float => write!(f, "float"),
            FieldType::Json => write!(f, "json"),
            FieldType::Yaml => write!(f, "yaml"),
            FieldType::File => write!(f, "file"),
        }
    }
}

/// A configured `minValue` / `maxValue`, kept as written so 64-bit
/// integer bounds are not rounded through a float.
///
/// Float bounds are finite. Use `Bound::try_from(f64)` or
/// [`Bound::from_value`], both of which reject NaN and infinities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Integer(i64),
    Float(f64),
}

impl Bound {
    /// Read a bound from a configuration value (number or numeric string)
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(Bound::Integer(*i)),
            Value::Float(f) => Bound::try_from(*f).ok(),
            other => {
                let text = other.as_text()?;
                let text = text.trim();
                if let Ok(i) = text.parse::<i64>() {
                    return Some(Bound::Integer(i));
                }
                text.parse::<f64>()
                    .ok()
                    .and_then(|f| Bound::try_from(f).ok())
            }
        }
    }

    /// Integer view; floats truncate toward zero and saturate
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(self) -> i64 {
        match self {
            Bound::Integer(i) => i,
            Bound::Float(f) => f as i64,
        }
    }

    /// Float view
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Bound::Integer(i) => i as f64,
            Bound::Float(f) => f,
        }
    }
}

impl From<i64> for Bound {
    fn from(v: i64) -> Self {
        Bound::Integer(v)
    }
}

impl TryFrom<f64> for Bound {
    type Error = Error;

    fn try_from(v: f64) -> Result<Self> {
        if v.is_finite() {
            Ok(Bound::Float(v))
        } else {
            Err(Error::InvalidFormat(format!("bound must be a finite number, got {v}")))
        }
    }
}

/// Definition of one input field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Lookup key into the input mapping
    pub name: String,
    /// Coercion rule
    pub field_type: FieldType,
    /// Whether the field must be present and non-empty
    pub required: bool,
    /// Regular expression applied to the string form before coercion
    pub pattern: Option<String>,
    /// Lower bound for numeric types
    pub min_value: Option<Bound>,
    /// Upper bound for numeric types
    pub max_value: Option<Bound>,
    /// Error number reported on any failure of this field
    pub errno: i32,
    /// Error message reported on any failure of this field
    pub errmsg: Option<String>,
}

impl FieldSpec {
    /// Create a new optional string field
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::String,
            required: false,
            pattern: None,
            min_value: None,
            max_value: None,
            errno: ERRNO_INPUT,
            errmsg: None,
        }
    }

    /// Set field type
    #[must_use]
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Mark field as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set pattern
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set numeric range
    #[must_use]
    pub fn with_range(mut self, min: impl Into<Bound>, max: impl Into<Bound>) -> Self {
        self.min_value = Some(min.into());
        self.max_value = Some(max.into());
        self
    }

    /// Set lower bound
    #[must_use]
    pub fn with_min(mut self, min: impl Into<Bound>) -> Self {
        self.min_value = Some(min.into());
        self
    }

    /// Set upper bound
    #[must_use]
    pub fn with_max(mut self, max: impl Into<Bound>) -> Self {
        self.max_value = Some(max.into());
        self
    }

    /// Set error number and message reported for this field
    #[must_use]
    pub fn with_error(mut self, errno: i32, errmsg: impl Into<String>) -> Self {
        self.errno = errno;
        self.errmsg = Some(errmsg.into());
        self
    }

    /// Pattern, if configured and non-empty
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref().filter(|p| !p.is_empty())
    }

    /// Error message for this field, configured or generated
    pub fn errmsg(&self) -> String {
        match &self.errmsg {
            Some(message) => message.clone(),
            None => format!("parameter error: {}", self.name),
        }
    }

    /// Effective bounds for `int` fields, always within the 32-bit range
    pub fn int_bounds(&self) -> (i64, i64) {
        let lo = i64::from(i32::MIN);
        let hi = i64::from(i32::MAX);
        let min = self.min_value.map_or(lo, Bound::as_i64).clamp(lo, hi);
        let max = self.max_value.map_or(hi, Bound::as_i64).clamp(lo, hi);
        (min, max)
    }

    /// Effective bounds for `long` fields
    pub fn long_bounds(&self) -> (i64, i64) {
        (
            self.min_value.map_or(i64::MIN, Bound::as_i64),
            self.max_value.map_or(i64::MAX, Bound::as_i64),
        )
    }

    /// Effective bounds for `float` fields.
    ///
    /// The defaults are the 64-bit *integer* limits cast to float, not the
    /// float type's own limits. Existing schemas rely on that narrower range.
    #[allow(clippy::cast_precision_loss)]
    pub fn float_bounds(&self) -> (f64, f64) {
        (
            self.min_value.map_or(i64::MIN as f64, Bound::as_f64),
            self.max_value.map_or(i64::MAX as f64, Bound::as_f64),
        )
    }
}

/// An ordered set of field specifications plus an optional method constraint
#[derive(Debug, Clone, Default)]
pub struct Schema {
    name: Option<String>,
    method: Option<String>,
    fields: Vec<FieldSpec>,
    patterns: PatternCache,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a display name used in logs
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Require the request to use `method`
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Append a field; declaration order is evaluation order
    #[must_use]
    pub fn add_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Display name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Required method; an empty configured method counts as none
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref().filter(|m| !m.is_empty())
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Find a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Compiled-pattern cache scoped to this schema
    pub fn patterns(&self) -> &PatternCache {
        &self.patterns
    }

    /// Compile every field pattern, reporting the first malformed one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] naming the field whose pattern does not
    /// compile.
    pub fn compile_patterns(&self) -> Result<()> {
        for field in &self.fields {
            if let Some(pattern) = field.pattern() {
                self.patterns
                    .get_or_compile(pattern)
                    .map_err(|e| Error::pattern(&field.name, pattern, e.to_string()))?;
            }
        }
        Ok(())
    }
}
