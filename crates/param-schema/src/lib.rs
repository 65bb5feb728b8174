#![deny(rust_2018_idioms)]
#![warn(clippy::all)]

//! # param-schema
//!
//! Declarative input schemas for request parameters.
//!
//! A [`Schema`] is an ordered list of [`FieldSpec`]s plus an optional
//! required request method. Schemas are built once from configuration
//! (see [`SchemaLoader`]) and are immutable afterwards, so a single
//! `Arc<Schema>` can serve any number of concurrent evaluations.

pub mod loader;
pub mod model;
pub mod patterns;

pub use loader::SchemaLoader;
pub use model::{Bound, ERRNO_CONFIG, ERRNO_INPUT, FieldSpec, FieldType, Schema};
pub use patterns::PatternCache;

use thiserror::Error;

/// Errors that can occur when building or loading schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("Duplicate field '{0}' in schema")]
    DuplicateField(String),

    #[error("Invalid pattern '{pattern}' for field '{field}': {message}")]
    Pattern {
        field: String,
        pattern: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] param_ir::Error),
}

impl Error {
    /// Build a pattern compilation error for a field
    pub fn pattern(
        field: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Pattern {
            field: field.into(),
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
