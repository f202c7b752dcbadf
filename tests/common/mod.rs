//! Shared fixtures for the integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use assertions::{Asserter, CollectingReporter, FailureInterceptor, ReportConfig, SharedReporter};

/// An asserter wired to an in-memory sink, plus the sink.
#[allow(dead_code)]
pub fn collecting() -> (Asserter, Rc<RefCell<CollectingReporter>>) {
    let sink = Rc::new(RefCell::new(CollectingReporter::new()));
    let asserter = Asserter::with_config(SharedReporter(sink.clone()), &ReportConfig::quiet());
    (asserter, sink)
}

/// An interceptor in front of an in-memory sink, plus the sink.
#[allow(dead_code)]
pub fn intercepted() -> (FailureInterceptor, Rc<RefCell<CollectingReporter>>) {
    let sink = Rc::new(RefCell::new(CollectingReporter::new()));
    (FailureInterceptor::new(SharedReporter(sink.clone())), sink)
}

#[allow(dead_code)]
pub fn messages(sink: &Rc<RefCell<CollectingReporter>>) -> Vec<String> {
    sink.borrow()
        .failures()
        .iter()
        .map(|failure| failure.message.clone())
        .collect()
}
