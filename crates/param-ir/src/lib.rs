#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # param-ir
//!
//! Dynamically-typed value model for loosely-typed request parameters.
//!
//! Request data arrives from query strings, form bodies, JSON payloads and
//! multipart uploads. This crate gives all of them one closed representation
//! ([`Value`]) with explicit, total conversions between variants, so that the
//! validation layer never relies on implicit dynamic coercion.

/// Structured document decoding (JSON, YAML) into the value model.
pub mod decode;
/// Uploaded-file handles carried inside request mappings.
pub mod file;
/// Total numeric and boolean conversions.
pub mod convert;
/// Key-path access into nested mappings.
pub mod path;
/// Serde support for the value model.
mod serde_impl;
/// Core value enum and mapping type.
pub mod value;

/// Document formats understood by [`decode::decode`].
pub use decode::Format;
/// Numeric conversion failures.
pub use convert::NumericError;
/// Uploaded-file metadata.
pub use file::FileHandle;
/// Value primitives.
pub use value::{Map, Value};

use thiserror::Error;

/// Errors that can occur when working with the value model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("{format} decode error: {message}")]
    Decode { format: Format, message: String },
}

impl Error {
    /// Build an invalid-path error with the offending path and reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a decode error carrying the parser diagnostic.
    pub fn decode(format: Format, message: impl Into<String>) -> Self {
        Self::Decode {
            format,
            message: message.into(),
        }
    }
}

/// Crate-local result type for value operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_error_keeps_context() {
        let error = Error::invalid_path("input/name", "not a map");
        assert_eq!(
            error.to_string(),
            "Invalid path 'input/name': not a map"
        );
    }

    #[test]
    fn decode_error_names_format() {
        let error = Error::decode(Format::Yaml, "unexpected end of stream");
        assert_eq!(
            error.to_string(),
            "yaml decode error: unexpected end of stream"
        );
    }
}
