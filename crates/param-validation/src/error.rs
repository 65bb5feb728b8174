//! Classified validation errors

use param_schema::{ERRNO_CONFIG, ERRNO_INPUT, FieldSpec};
use std::fmt;
use thiserror::Error;

/// Fixed message reported when the request method is not the one the
/// schema requires.
pub const METHOD_MISMATCH_MESSAGE: &str = "unsupported request method";

/// Classification of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Request method differs from the schema's method
    MethodMismatch,
    /// Required field absent or empty
    RequiredMissing,
    /// Value does not match the field pattern
    PatternMismatch,
    /// The schema's own pattern is malformed (configuration defect)
    PatternCompile,
    /// Numeric value outside the field bounds
    RangeViolation,
    /// Value could not be read as the field's numeric type
    Conversion,
    /// Embedded JSON/YAML document is malformed
    Decode,
    /// File field has no uploaded-file handle
    FileMissing,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MethodMismatch => "method_mismatch",
            ErrorKind::RequiredMissing => "required_missing",
            ErrorKind::PatternMismatch => "pattern_mismatch",
            ErrorKind::PatternCompile => "pattern_compile",
            ErrorKind::RangeViolation => "range_violation",
            ErrorKind::Conversion => "conversion",
            ErrorKind::Decode => "decode",
            ErrorKind::FileMissing => "file_missing",
        };
        f.write_str(name)
    }
}

/// A classified validation error.
///
/// `errno` and `message` are what the caller sees. `diagnostic` carries
/// detail for logs (parser output, expected method) and is never part of
/// the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    kind: ErrorKind,
    errno: i32,
    message: String,
    field: Option<String>,
    diagnostic: Option<String>,
}

impl ValidationError {
    /// Method guard failure with the fixed generic code and message
    pub fn method_mismatch(expected: &str, actual: &str) -> Self {
        Self {
            kind: ErrorKind::MethodMismatch,
            errno: ERRNO_INPUT,
            message: METHOD_MISMATCH_MESSAGE.to_string(),
            field: None,
            diagnostic: Some(format!("expected {expected}, got {actual}")),
        }
    }

    /// Failure attributed to `spec`, reported with its errno/errmsg
    pub fn for_field(kind: ErrorKind, spec: &FieldSpec) -> Self {
        Self {
            kind,
            errno: spec.errno,
            message: spec.errmsg(),
            field: Some(spec.name.clone()),
            diagnostic: None,
        }
    }

    /// Malformed pattern in the schema. Reported with the configuration
    /// error number, not the field's, since the caller is not at fault.
    pub fn pattern_compile(spec: &FieldSpec, pattern: &str, diagnostic: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::PatternCompile,
            errno: ERRNO_CONFIG,
            message: format!(
                "schema configuration error: invalid pattern '{pattern}' for field '{}'",
                spec.name
            ),
            field: Some(spec.name.clone()),
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Attach diagnostic detail
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn errno(&self) -> i32 {
        self.errno
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Field the failure is attributed to; `None` for the method guard
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Whether the schema, not the request, is at fault
    pub fn is_configuration_defect(&self) -> bool {
        self.kind == ErrorKind::PatternCompile
    }
}
