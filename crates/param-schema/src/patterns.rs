//! Compiled pattern cache shared by concurrent evaluations

use dashmap::DashMap;
use regex::Regex;
use std::sync::Arc;
use tracing::trace;

/// Cache of compiled regular expressions keyed by pattern text.
///
/// Lives as long as the owning schema. Safe for concurrent readers; a
/// pattern compiled twice by racing evaluations yields identical entries.
#[derive(Debug, Clone, Default)]
pub struct PatternCache {
    compiled: Arc<DashMap<String, Regex>>,
}

impl PatternCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled form of `pattern`, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Returns the regex compiler's error when `pattern` is malformed.
    /// Failed compilations are not cached.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        if let Some(entry) = self.compiled.get(pattern) {
            return Ok(entry.value().clone());
        }

        trace!(pattern, "compiling pattern");
        let regex = Regex::new(pattern)?;
        self.compiled.insert(pattern.to_owned(), regex.clone());
        Ok(regex)
    }

    /// Whether `pattern` has already been compiled
    pub fn contains(&self, pattern: &str) -> bool {
        self.compiled.contains_key(pattern)
    }

    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// Check if no pattern has been compiled yet
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
