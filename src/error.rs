//! Error types.
//!
//! Two tiers exist. [`EvalError`] describes an expression under test that
//! failed to produce a value; the engine always turns it into a reported
//! failure and never returns it to the caller. [`AssertionFailures`] is what a
//! [`TestScope`](crate::TestScope) hands back when it is finished with
//! failures on record, and renders through `miette`.

use miette::Diagnostic;
use thiserror::Error;

use crate::FailureRecord;

/// Why a deferred expression produced no outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The expression returned `Err`.
    #[error("{0}")]
    Raised(String),

    /// The expression panicked.
    #[error("panicked: {0}")]
    Panicked(String),
}

/// Failures recorded over the lifetime of a test scope.
#[derive(Debug, Error, Diagnostic)]
#[error("{} assertion failure(s) recorded", .failures.len())]
#[diagnostic(code(assertions::failed))]
pub struct AssertionFailures {
    pub failures: Vec<FailureRecord>,
    #[help]
    summary: String,
}

impl AssertionFailures {
    pub fn new(failures: Vec<FailureRecord>) -> Self {
        let summary = failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        Self { failures, summary }
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}
