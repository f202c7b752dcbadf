//! Failure interception, for testing assertions that are supposed to fail.
//!
//! A [`FailureInterceptor`] sits between the assertions and the real
//! reporter. Outside a capture scope it forwards every report. Inside
//! [`FailureInterceptor::capture`] it keeps reports to itself and hands them
//! back to the caller, so "this assertion fails" can be asserted without the
//! failure reaching the enclosing test.
//!
//! Every failure raised inside one scope is kept, in order; `capture` returns
//! the first and `capture_all` returns them all.
//!
//! A panicking body is caught and reported, but the panic hook has already
//! run by then; the default hook's stderr line can be silenced with
//! [`std::panic::set_hook`].

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::outcome::panic_message;
use crate::{Asserter, FailureRecord, FailureReporter, ReportConfig, SharedReporter, SourceLocation};

const NO_FAILURE: &str = "expected the assertion to fail";

#[derive(Debug, Default)]
struct CaptureState {
    capturing: bool,
    pending: Vec<FailureRecord>,
}

/// A reporter wrapper that can swallow failures for the duration of a scope.
///
/// Cloning yields another handle to the same state. Not `Send`: one
/// interceptor belongs to one test.
#[derive(Clone)]
pub struct FailureInterceptor {
    inner: SharedReporter,
    state: Rc<RefCell<CaptureState>>,
}

impl FailureInterceptor {
    /// Wraps `inner`, starting idle.
    pub fn new(inner: SharedReporter) -> Self {
        Self {
            inner,
            state: Rc::new(RefCell::new(CaptureState::default())),
        }
    }

    /// A reporter handle that routes through this interceptor.
    pub fn reporter(&self) -> SharedReporter {
        SharedReporter::new(self.clone())
    }

    /// An asserter whose failures route through this interceptor.
    pub fn asserter(&self) -> Asserter {
        Asserter::new(self.reporter())
    }

    pub fn asserter_with_config(&self, config: &ReportConfig) -> Asserter {
        Asserter::with_config(self.reporter(), config)
    }

    pub fn is_capturing(&self) -> bool {
        self.state.borrow().capturing
    }

    /// Runs `body` with interception on and returns the first failure it
    /// reported. If it reported none, reports `expected the assertion to
    /// fail` and returns `None`. A panic in `body` is reported as
    /// `error: <panic message>` and also yields `None`.
    #[track_caller]
    pub fn capture<R>(&self, body: impl FnOnce() -> R) -> Option<FailureRecord> {
        let location = SourceLocation::caller();
        self.run(location, move || {
            body();
            Ok(())
        })
        .into_iter()
        .next()
    }

    /// Like [`FailureInterceptor::capture`], returning every failure in
    /// report order.
    #[track_caller]
    pub fn capture_all<R>(&self, body: impl FnOnce() -> R) -> Vec<FailureRecord> {
        let location = SourceLocation::caller();
        self.run(location, move || {
            body();
            Ok(())
        })
    }

    /// Like [`FailureInterceptor::capture`] for a fallible body. An `Err` is
    /// reported as `error: <error>` rather than treated as a captured
    /// assertion failure.
    #[track_caller]
    pub fn try_capture<R, E: fmt::Display>(
        &self,
        body: impl FnOnce() -> Result<R, E>,
    ) -> Option<FailureRecord> {
        let location = SourceLocation::caller();
        self.run(location, move || body().map(drop).map_err(|error| error.to_string()))
            .into_iter()
            .next()
    }

    fn run(
        &self,
        location: SourceLocation,
        body: impl FnOnce() -> Result<(), String>,
    ) -> Vec<FailureRecord> {
        let scope = CaptureScope::open(&self.state);
        trace!(%location, "capture scope opened");
        let outcome = match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(result) => result,
            Err(payload) => Err(panic_message(payload.as_ref())),
        };
        let captured = scope.close();
        trace!(%location, captured = captured.len(), "capture scope closed");

        match outcome {
            Err(error) => {
                self.dispatch(&format!("error: {}", error), &location, true);
                Vec::new()
            }
            Ok(()) if captured.is_empty() => {
                self.dispatch(NO_FAILURE, &location, true);
                Vec::new()
            }
            Ok(()) => captured,
        }
    }

    fn dispatch(&self, message: &str, location: &SourceLocation, expected: bool) {
        {
            let mut state = self.state.borrow_mut();
            if state.capturing {
                debug!(%location, failure = message, "failure intercepted");
                state
                    .pending
                    .push(FailureRecord::new(message, location.clone(), expected));
                return;
            }
        }
        self.inner.report(message, location, expected);
    }
}

impl FailureReporter for FailureInterceptor {
    fn report(&mut self, message: &str, location: &SourceLocation, expected: bool) {
        self.dispatch(message, location, expected);
    }
}

/// Saves the enclosing scope's flag and pending failures on open and puts
/// them back on close, or on drop if the scope is abandoned.
struct CaptureScope<'a> {
    state: &'a RefCell<CaptureState>,
    previous_capturing: bool,
    previous_pending: Vec<FailureRecord>,
    closed: bool,
}

impl<'a> CaptureScope<'a> {
    fn open(state: &'a RefCell<CaptureState>) -> Self {
        let mut current = state.borrow_mut();
        let previous_capturing = mem::replace(&mut current.capturing, true);
        let previous_pending = mem::take(&mut current.pending);
        drop(current);
        Self {
            state,
            previous_capturing,
            previous_pending,
            closed: false,
        }
    }

    fn close(mut self) -> Vec<FailureRecord> {
        self.restore()
    }

    fn restore(&mut self) -> Vec<FailureRecord> {
        self.closed = true;
        let mut current = self.state.borrow_mut();
        current.capturing = self.previous_capturing;
        mem::replace(&mut current.pending, mem::take(&mut self.previous_pending))
    }
}

impl Drop for CaptureScope<'_> {
    fn drop(&mut self) {
        if !self.closed {
            self.restore();
        }
    }
}
