#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # param-pipeline
//!
//! The request pipeline side of input validation.
//!
//! A pipeline step reads request-scoped values through a [`Context`],
//! runs its work, and hands control back with a [`Continuation`]. The
//! [`InputStep`] validates and coerces the request input in place and
//! continues with `done` or with a classified error.

pub mod config;
pub mod context;
pub mod continuation;
pub mod step;

pub use config::StepConfig;
pub use context::{Context, MapContext};
pub use continuation::{Continuation, DONE, StepError};
pub use step::{InputStep, Step};

use thiserror::Error;

/// Errors that can occur while building or running pipeline steps
#[derive(Error, Debug)]
pub enum Error {
    #[error("Step configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Schema(#[from] param_schema::Error),

    #[error("Context error during {operation} at '{path}': {message}")]
    Context {
        operation: String,
        path: String,
        message: String,
    },
}

impl Error {
    /// Create a structured context error with operation/path detail.
    pub fn context(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Context {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_error_preserves_operation_and_path() {
        let error = Error::context("set", "request/input", "'request' is a string, not a map");
        match &error {
            Error::Context {
                operation,
                path,
                message,
            } => {
                assert_eq!(operation, "set");
                assert_eq!(path, "request/input");
                assert!(message.contains("not a map"));
            }
            other => panic!("expected context variant, got {other:?}"),
        }
        assert!(error.to_string().contains("request/input"));
    }

    #[test]
    fn schema_error_is_transparent() {
        let error = Error::from(param_schema::Error::DuplicateField("age".to_string()));
        assert_eq!(
            error.to_string(),
            param_schema::Error::DuplicateField("age".to_string()).to_string()
        );
    }
}
