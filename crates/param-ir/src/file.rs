//! Uploaded file handles
#![allow(clippy::must_use_candidate)] // Constructor helpers are clear at call sites without #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent setters are designed for chaining.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata for a file uploaded with a request.
///
/// The handle describes the upload; it does not own the file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    /// Client-supplied file name
    pub filename: String,

    /// Declared MIME type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Size in bytes
    pub size: u64,

    /// Where the upload was spooled, if on disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
}

impl FileHandle {
    /// Create a handle for an upload of the given name and size
    pub fn new(filename: impl Into<String>, size: u64) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            size,
            location: None,
        }
    }

    /// Set the declared content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the spool location
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_handle_builder() {
        let handle = FileHandle::new("avatar.png", 2048)
            .with_content_type("image/png")
            .with_location("/tmp/upload-1");

        assert_eq!(handle.filename, "avatar.png");
        assert_eq!(handle.size, 2048);
        assert_eq!(handle.content_type.as_deref(), Some("image/png"));
        assert_eq!(handle.location, Some(PathBuf::from("/tmp/upload-1")));
    }
}
