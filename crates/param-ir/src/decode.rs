//! Decoding of textual documents into [`Value`]

use crate::value::Value;
use crate::{Error, Result};
use std::fmt;
use tracing::trace;

/// Supported structured document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON text
    Json,
    /// YAML text
    Yaml,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
        }
    }
}

impl Format {
    /// Pick a format from a file extension; anything not YAML is JSON
    #[must_use]
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Json,
        }
    }
}

/// Decode `text` as a structured document of the given format.
///
/// # Errors
///
/// Returns [`Error::Decode`] carrying the parser diagnostic when the text is
/// malformed.
pub fn decode(format: Format, text: &str) -> Result<Value> {
    trace!(%format, len = text.len(), "decoding document");
    match format {
        Format::Json => serde_json::from_str(text).map_err(|e| Error::decode(format, e.to_string())),
        Format::Yaml => serde_yaml::from_str(text).map_err(|e| Error::decode(format, e.to_string())),
    }
}
