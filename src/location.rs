//! Source locations attached to every reported failure.
//!
//! A location is opaque data as far as the matching engine is concerned: it is
//! taken from the call site (via `#[track_caller]`) or supplied explicitly and
//! then handed to the reporter untouched.

use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};

/// A `file:line` pair identifying where an assertion was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// The location of the outermost non-`#[track_caller]` caller.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Builds a [`SourceLocation`] for the line the macro is expanded on.
///
/// ```
/// let here = assertions::location!();
/// assert!(here.file.ends_with(".rs"));
/// ```
#[macro_export]
macro_rules! location {
    () => {
        $crate::SourceLocation::new(file!(), line!())
    };
}
