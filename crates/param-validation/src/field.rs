//! Field validator
//!
//! Checks one field specification against the input mapping: required-ness,
//! then pattern, then type coercion. The validator only reads the mapping;
//! writing the coerced value back is the evaluator's job.

use crate::coerce::{Coerced, coerce};
use crate::error::{ErrorKind, ValidationError};
use param_ir::{Map, Value};
use param_schema::{FieldSpec, PatternCache};
use tracing::{error, trace};

/// What validating one field produced
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// Optional field absent from the input; nothing to do
    Skipped,
    /// Value accepted without conversion
    Accepted,
    /// Value accepted; the input entry must become this value
    Coerced(Value),
}

/// Validate `spec` against `input`.
///
/// # Errors
///
/// The first failed check, reported with the field's errno/errmsg. A
/// malformed pattern is reported as `PatternCompile` regardless of input.
pub fn validate_field(
    spec: &FieldSpec,
    patterns: &PatternCache,
    input: &Map,
) -> Result<FieldOutcome, ValidationError> {
    let raw = input.get(&spec.name);

    if spec.required && raw.is_none_or(Value::is_empty) {
        return Err(ValidationError::for_field(ErrorKind::RequiredMissing, spec));
    }

    if let Some(pattern) = spec.pattern() {
        let regex = patterns.get_or_compile(pattern).map_err(|e| {
            error!(field = %spec.name, pattern, error = %e, "Schema pattern does not compile");
            ValidationError::pattern_compile(spec, pattern, e.to_string())
        })?;
        let text = raw.and_then(Value::as_text).unwrap_or_default();
        if !regex.is_match(&text) {
            return Err(ValidationError::for_field(ErrorKind::PatternMismatch, spec));
        }
    }

    // An explicit null counts as absent.
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        trace!(field = %spec.name, "Optional field absent");
        return Ok(FieldOutcome::Skipped);
    };

    match coerce(spec, raw) {
        Ok(Coerced::Keep) => Ok(FieldOutcome::Accepted),
        Ok(Coerced::Replace(value)) => Ok(FieldOutcome::Coerced(value)),
        Err(failure) => {
            let error = ValidationError::for_field(failure.kind, spec);
            Err(match failure.diagnostic {
                Some(diagnostic) => error.with_diagnostic(diagnostic),
                None => error,
            })
        }
    }
}
