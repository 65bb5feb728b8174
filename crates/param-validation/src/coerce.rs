//! Type coercers
//!
//! One pure function per field type. Each converts a raw value into the
//! canonical representation for the type or reports why it cannot.

use crate::error::ErrorKind;
use param_ir::decode::decode;
use param_ir::{Format, NumericError, Value};
use param_schema::{FieldSpec, FieldType};

/// Successful coercion result
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// Leave the input entry untouched
    Keep,
    /// Overwrite the input entry with this canonical value
    Replace(Value),
}

/// Why a coercion failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionFailure {
    pub kind: ErrorKind,
    pub diagnostic: Option<String>,
}

impl CoercionFailure {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            diagnostic: None,
        }
    }

    fn with_diagnostic(kind: ErrorKind, diagnostic: impl Into<String>) -> Self {
        Self {
            kind,
            diagnostic: Some(diagnostic.into()),
        }
    }
}

impl From<NumericError> for CoercionFailure {
    fn from(error: NumericError) -> Self {
        let kind = match error {
            NumericError::NotANumber => ErrorKind::Conversion,
            NumericError::OutOfRange => ErrorKind::RangeViolation,
        };
        Self::with_diagnostic(kind, error.to_string())
    }
}

/// Dispatch to the coercer for `spec.field_type`
///
/// # Errors
///
/// Returns the coercer's failure unchanged.
pub fn coerce(spec: &FieldSpec, raw: &Value) -> Result<Coerced, CoercionFailure> {
    match spec.field_type {
        FieldType::String => Ok(Coerced::Keep),
        FieldType::Int => coerce_integer(raw, spec.int_bounds()).map(Coerced::Replace),
        FieldType::Long => coerce_integer(raw, spec.long_bounds()).map(Coerced::Replace),
        FieldType::Bool => Ok(Coerced::Replace(coerce_bool(raw))),
        FieldType::Float => coerce_float(raw, spec.float_bounds()).map(Coerced::Replace),
        FieldType::Json => coerce_document(raw, Format::Json).map(Coerced::Replace),
        FieldType::Yaml => coerce_document(raw, Format::Yaml).map(Coerced::Replace),
        FieldType::File => check_file(raw).map(|()| Coerced::Keep),
    }
}

/// Read an integer and check it against inclusive `(min, max)` bounds
///
/// # Errors
///
/// `Conversion` when the value is not numeric, `RangeViolation` when it is
/// outside the bounds.
pub fn coerce_integer(raw: &Value, (min, max): (i64, i64)) -> Result<Value, CoercionFailure> {
    let number = raw.to_i64()?;
    if number < min || number > max {
        return Err(CoercionFailure::with_diagnostic(
            ErrorKind::RangeViolation,
            format!("{number} outside [{min}, {max}]"),
        ));
    }
    Ok(Value::Integer(number))
}

/// Permissive boolean; never fails
pub fn coerce_bool(raw: &Value) -> Value {
    Value::Bool(raw.to_bool())
}

/// Read a float and check it against inclusive `(min, max)` bounds
///
/// # Errors
///
/// `Conversion` when the value is not numeric, `RangeViolation` when it is
/// outside the bounds.
pub fn coerce_float(raw: &Value, (min, max): (f64, f64)) -> Result<Value, CoercionFailure> {
    let number = raw.to_f64()?;
    if number < min || number > max {
        return Err(CoercionFailure::with_diagnostic(
            ErrorKind::RangeViolation,
            format!("{number} outside [{min}, {max}]"),
        ));
    }
    Ok(Value::Float(number))
}

/// Decode the string form of `raw` as a structured document.
///
/// A value that is already a map or sequence was decoded upstream and is
/// returned as-is.
///
/// # Errors
///
/// `Decode` carrying the parser diagnostic.
pub fn coerce_document(raw: &Value, format: Format) -> Result<Value, CoercionFailure> {
    if raw.is_structured() {
        return Ok(raw.clone());
    }
    let text = raw.as_text().unwrap_or_default();
    decode(format, &text).map_err(|e| CoercionFailure::with_diagnostic(ErrorKind::Decode, e.to_string()))
}

/// Require an uploaded-file handle. Presence is validated, not content.
///
/// # Errors
///
/// `FileMissing` for any value that is not a file handle.
pub fn check_file(raw: &Value) -> Result<(), CoercionFailure> {
    match raw {
        Value::File(_) => Ok(()),
        _ => Err(CoercionFailure::new(ErrorKind::FileMissing)),
    }
}
