//! Request method guard

use crate::error::ValidationError;
use param_schema::Schema;
use tracing::debug;

/// Check the request method against the schema's declared method.
///
/// A schema without a method (or with an empty one) accepts any request
/// method. Comparison is exact.
///
/// # Errors
///
/// Returns a `MethodMismatch` error when the schema declares a method that
/// differs from `request_method`.
pub fn check_method(schema: &Schema, request_method: &str) -> Result<(), ValidationError> {
    match schema.method() {
        Some(expected) if expected != request_method => {
            debug!(expected, actual = request_method, "Request method rejected");
            Err(ValidationError::method_mismatch(expected, request_method))
        }
        _ => Ok(()),
    }
}
