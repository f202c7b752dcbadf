//! Non-terminating assertions for tests.
//!
//! An assertion evaluates a deferred expression once, compares the optional
//! result with an optional expected value, and on mismatch sends one report to
//! the installed [`FailureReporter`]. The test keeps running. The
//! [`FailureInterceptor`] lets a test check that an assertion fails without
//! the failure escaping.
//!
//! ```
//! use assertions::{ReportConfig, TestScope};
//!
//! let scope = TestScope::with_config(ReportConfig::quiet());
//! let check = scope.asserter();
//! let harness = scope.interceptor();
//!
//! let failure = harness.capture(|| harness.asserter().equal(|| Some(1), Some(2)));
//! assert!(failure.unwrap().mentions("1 did not match 2"));
//!
//! check.equal(|| Some(3), Some(3));
//! scope.finish().unwrap();
//! ```

pub use crate::config::ReportConfig;
pub use crate::engine::{Asserter, Check};
pub use crate::error::{AssertionFailures, EvalError};
pub use crate::failure::FailureRecord;
pub use crate::harness::FailureInterceptor;
pub use crate::host::TestScope;
pub use crate::location::SourceLocation;
pub use crate::outcome::{evaluate, IntoOutcome, Outcome};
pub use crate::reporter::{
    CollectingReporter, FailureReporter, NullReporter, SharedReporter, StderrReporter,
};

pub mod config;
mod detail;
pub mod engine;
pub mod error;
pub mod failure;
pub mod harness;
pub mod host;
pub mod location;
pub mod outcome;
pub mod reporter;
