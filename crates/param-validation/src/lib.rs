#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # param-validation
//!
//! Validation and coercion of request parameters against a declarative
//! schema.
//!
//! Fields are checked in declaration order and the first failure wins.
//! Accepted numeric, boolean and document fields are rewritten in place to
//! their canonical representation.
//!
//! ## Example Usage
//!
//! ```rust
//! use param_ir::{Map, Value};
//! use param_schema::{FieldSpec, FieldType, Schema};
//! use param_validation::validate;
//!
//! let schema = Schema::new()
//!     .add_field(FieldSpec::new("username").required().with_pattern("^[a-z]+$"))
//!     .add_field(FieldSpec::new("age").with_type(FieldType::Int).with_range(0_i64, 150_i64));
//!
//! let mut input = Map::new();
//! input.insert("username".to_string(), Value::from("alice"));
//! input.insert("age".to_string(), Value::from("30"));
//!
//! validate(&schema, &mut input, "GET").unwrap();
//! assert_eq!(input.get("age"), Some(&Value::Integer(30)));
//! ```

pub mod coerce;
pub mod engine;
pub mod error;
pub mod field;
pub mod method;

pub use engine::{Evaluation, EvaluationReport, EvaluationState, SchemaEvaluator};
pub use error::{ErrorKind, METHOD_MISMATCH_MESSAGE, ValidationError};
pub use field::{FieldOutcome, validate_field};
pub use method::check_method;

use param_ir::Map;
use param_schema::Schema;

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Evaluate `schema` once against `input` without building a
/// [`SchemaEvaluator`].
///
/// # Errors
///
/// The first validation failure, in declaration order.
pub fn validate(schema: &Schema, input: &mut Map, method: &str) -> Result<EvaluationReport> {
    Evaluation::new(schema, input, method).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use param_ir::Value;
    use param_schema::FieldSpec;

    #[test]
    fn test_convenience_validate() {
        let schema = Schema::new().add_field(FieldSpec::new("q").required());
        let mut input = Map::new();
        input.insert("q".to_string(), Value::from("rust"));

        let report = validate(&schema, &mut input, "GET").unwrap();
        assert_eq!(report.accepted, vec!["q".to_string()]);
    }

    #[test]
    fn test_convenience_validate_failure() {
        let schema = Schema::new().with_method("POST");
        let error = validate(&schema, &mut Map::new(), "GET").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MethodMismatch);
    }
}
