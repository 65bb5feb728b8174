//! Total conversions from [`Value`] to numeric and boolean forms.
//!
//! Every conversion either yields a value or a typed [`NumericError`]; none
//! of them panic or silently substitute a default number.

use crate::value::Value;
use thiserror::Error;

/// 2^63, the first float magnitude outside the `i64` range.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Why a value could not be read as a number
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    #[error("value is not a number")]
    NotANumber,

    #[error("value is outside the 64-bit integer range")]
    OutOfRange,
}

impl Value {
    /// Read the value as a signed 64-bit integer.
    ///
    /// Floats and float literals are truncated toward zero. Booleans map to
    /// 0 and 1.
    ///
    /// # Errors
    ///
    /// [`NumericError::NotANumber`] for non-numeric values and
    /// [`NumericError::OutOfRange`] for numbers beyond the `i64` range.
    pub fn to_i64(&self) -> Result<i64, NumericError> {
        match self {
            Value::Integer(i) => Ok(*i),
            Value::Float(f) => float_to_i64(*f),
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::String(s) => parse_i64(s),
            Value::Binary(bytes) => std::str::from_utf8(bytes)
                .map_err(|_| NumericError::NotANumber)
                .and_then(parse_i64),
            Value::Null | Value::Map(_) | Value::Seq(_) | Value::File(_) => {
                Err(NumericError::NotANumber)
            }
        }
    }

    /// Read the value as a 64-bit float.
    ///
    /// # Errors
    ///
    /// [`NumericError::NotANumber`] for non-numeric values, including `NaN`.
    #[allow(clippy::cast_precision_loss)] // i64 -> f64 is the documented widening.
    pub fn to_f64(&self) -> Result<f64, NumericError> {
        let number = match self {
            Value::Integer(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::String(s) => parse_f64(s)?,
            Value::Binary(bytes) => std::str::from_utf8(bytes)
                .map_err(|_| NumericError::NotANumber)
                .and_then(parse_f64)?,
            Value::Null | Value::Map(_) | Value::Seq(_) | Value::File(_) => {
                return Err(NumericError::NotANumber);
            }
        };
        if number.is_nan() {
            return Err(NumericError::NotANumber);
        }
        Ok(number)
    }

    /// Permissive truthiness: never fails.
    ///
    /// Numbers are true when nonzero; strings are true for `true`, `yes`,
    /// `on` (any case) or a nonzero number; everything else is false.
    #[must_use]
    pub fn to_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::String(s) => text_to_bool(s),
            Value::Binary(bytes) => std::str::from_utf8(bytes).is_ok_and(text_to_bool),
            Value::Null | Value::Map(_) | Value::Seq(_) | Value::File(_) => false,
        }
    }
}

fn parse_i64(text: &str) -> Result<i64, NumericError> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Ok(i);
    }
    match text.parse::<f64>() {
        Ok(f) => float_to_i64(f),
        Err(_) => Err(NumericError::NotANumber),
    }
}

fn parse_f64(text: &str) -> Result<f64, NumericError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| NumericError::NotANumber)
}

#[allow(clippy::cast_possible_truncation)] // Range is checked before the cast.
fn float_to_i64(f: f64) -> Result<i64, NumericError> {
    if f.is_nan() {
        return Err(NumericError::NotANumber);
    }
    let truncated = f.trunc();
    if truncated >= I64_LIMIT || truncated < -I64_LIMIT {
        return Err(NumericError::OutOfRange);
    }
    Ok(truncated as i64)
}

fn text_to_bool(text: &str) -> bool {
    let lowered = text.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "true" | "yes" | "on" => true,
        "false" | "no" | "off" | "" => false,
        other => other.parse::<f64>().is_ok_and(|n| n != 0.0 && !n.is_nan()),
    }
}
