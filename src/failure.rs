//! The recorded form of a single reported failure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SourceLocation;

/// One failure as it reached a reporter: the text, where it came from, and
/// the host's "expected failure" flag, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub message: String,
    pub location: SourceLocation,
    pub expected: bool,
}

impl FailureRecord {
    pub fn new(message: impl Into<String>, location: SourceLocation, expected: bool) -> Self {
        Self {
            message: message.into(),
            location,
            expected,
        }
    }

    /// True if the failure text contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle)
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}
