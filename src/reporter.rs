//! The failure reporting boundary.
//!
//! Everything the engine and the interception harness emit goes through a
//! [`FailureReporter`]. Call sites hold a [`SharedReporter`] handed to them by
//! whoever owns the test, so the sink can be swapped without touching the
//! assertions.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{FailureRecord, SourceLocation};

/// Receives failure notifications. One-way: nothing is returned to the caller.
pub trait FailureReporter {
    fn report(&mut self, message: &str, location: &SourceLocation, expected: bool);
}

/// Discards every report.
pub struct NullReporter;

impl FailureReporter for NullReporter {
    fn report(&mut self, _message: &str, _location: &SourceLocation, _expected: bool) {}
}

/// Keeps every report in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    failures: Vec<FailureRecord>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&mut self) -> Vec<FailureRecord> {
        std::mem::take(&mut self.failures)
    }
}

impl FailureReporter for CollectingReporter {
    fn report(&mut self, message: &str, location: &SourceLocation, expected: bool) {
        self.failures
            .push(FailureRecord::new(message, location.clone(), expected));
    }
}

/// Writes each report to stderr as it arrives.
pub struct StderrReporter {
    pub use_colors: bool,
}

impl FailureReporter for StderrReporter {
    fn report(&mut self, message: &str, location: &SourceLocation, _expected: bool) {
        eprint!("{}", render_failure(message, location, self.use_colors));
    }
}

/// Cloneable handle to the reporter installed for the current test.
#[derive(Clone)]
pub struct SharedReporter(pub Rc<RefCell<dyn FailureReporter>>);

impl SharedReporter {
    /// Wraps any sink.
    pub fn new<T: FailureReporter + 'static>(sink: T) -> Self {
        SharedReporter(Rc::new(RefCell::new(sink)))
    }

    pub fn report(&self, message: &str, location: &SourceLocation, expected: bool) {
        self.0.borrow_mut().report(message, location, expected);
    }

    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, dyn FailureReporter> {
        self.0.borrow_mut()
    }
}

/// Renders one failure as a `FAIL location` header followed by the message,
/// indented. Rendered into a buffer and printed with `eprint!` so the test
/// runner's output capture still applies.
pub(crate) fn render_failure(message: &str, location: &SourceLocation, use_colors: bool) -> String {
    let mut buffer = if use_colors {
        Buffer::ansi()
    } else {
        Buffer::no_color()
    };
    let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(buffer, "FAIL");
    let _ = buffer.reset();
    let _ = writeln!(buffer, " {}", location);
    for line in message.lines() {
        let _ = writeln!(buffer, "    {}", line);
    }
    String::from_utf8_lossy(buffer.as_slice()).into_owned()
}
