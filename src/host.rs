//! The default reporter for code running under `cargo test`.
//!
//! A [`TestScope`] records every failure without stopping the test, so one
//! test can report many mismatches. At the end the test either calls
//! [`TestScope::finish`] and propagates the result, or lets the scope drop, in
//! which case recorded failures turn into a panic and libtest marks the test
//! failed.
//!
//! ```should_panic
//! use assertions::TestScope;
//!
//! let scope = TestScope::named("totals");
//! let check = scope.asserter();
//! check.equal(|| Some(2 + 2), Some(5));
//! check.equal(|| Some("a"), Some("b"));
//! // Dropped here with two failures on record.
//! ```

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;
use std::thread;

use miette::Report;
use tracing::error;

use crate::reporter::render_failure;
use crate::{
    AssertionFailures, Asserter, FailureInterceptor, FailureRecord, FailureReporter, ReportConfig,
    SharedReporter, SourceLocation,
};

struct HostReporter {
    name: Option<String>,
    config: ReportConfig,
    failures: Rc<RefCell<Vec<FailureRecord>>>,
}

impl FailureReporter for HostReporter {
    fn report(&mut self, message: &str, location: &SourceLocation, expected: bool) {
        error!(
            scope = self.name.as_deref().unwrap_or("-"),
            %location,
            expected,
            "{}",
            message
        );
        if self.config.echo_to_stderr {
            eprint!("{}", render_failure(message, location, self.config.use_colors));
        }
        self.failures
            .borrow_mut()
            .push(FailureRecord::new(message, location.clone(), expected));
    }
}

/// Records failures for one test.
pub struct TestScope {
    name: Option<String>,
    config: ReportConfig,
    failures: Rc<RefCell<Vec<FailureRecord>>>,
    finished: bool,
}

impl TestScope {
    pub fn new() -> Self {
        Self::with_config(ReportConfig::default())
    }

    /// A scope whose log lines carry `name`.
    pub fn named(name: impl Into<String>) -> Self {
        let mut scope = Self::new();
        scope.name = Some(name.into());
        scope
    }

    pub fn with_config(config: ReportConfig) -> Self {
        Self {
            name: None,
            config,
            failures: Rc::new(RefCell::new(Vec::new())),
            finished: false,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// A reporter handle that records into this scope.
    pub fn reporter(&self) -> SharedReporter {
        SharedReporter::new(HostReporter {
            name: self.name.clone(),
            config: self.config.clone(),
            failures: self.failures.clone(),
        })
    }

    pub fn asserter(&self) -> Asserter {
        Asserter::with_config(self.reporter(), &self.config)
    }

    /// An interceptor in front of this scope, for testing failing assertions.
    pub fn interceptor(&self) -> FailureInterceptor {
        FailureInterceptor::new(self.reporter())
    }

    /// Failures recorded so far, in report order.
    pub fn failures(&self) -> Vec<FailureRecord> {
        self.failures.borrow().clone()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.borrow().len()
    }

    /// The recorded failures as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.failures.borrow())
    }

    /// Ends the scope. Fails if anything was reported.
    pub fn finish(mut self) -> Result<(), AssertionFailures> {
        self.finished = true;
        let failures = mem::take(&mut *self.failures.borrow_mut());
        if failures.is_empty() {
            Ok(())
        } else {
            Err(AssertionFailures::new(failures))
        }
    }
}

impl Default for TestScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestScope {
    fn drop(&mut self) {
        if self.finished || !self.config.panic_on_drop || thread::panicking() {
            return;
        }
        let failures = mem::take(&mut *self.failures.borrow_mut());
        if !failures.is_empty() {
            panic!("{:?}", Report::new(AssertionFailures::new(failures)));
        }
    }
}
