//! The assertion surface.
//!
//! Every assertion evaluates its expression once, decides match or mismatch,
//! and on mismatch makes exactly one call to the installed reporter. Nothing
//! here panics or returns an error to the test: the reporter is the only
//! failure channel.
//!
//! ```
//! use assertions::{Asserter, CollectingReporter, SharedReporter};
//! use std::{cell::RefCell, rc::Rc};
//!
//! let sink = Rc::new(RefCell::new(CollectingReporter::new()));
//! let check = Asserter::new(SharedReporter(sink.clone()));
//!
//! let name: Option<String> = Some("ferris".to_string());
//! assert_eq!(check.equal(|| name.clone(), Some("ferris".to_string())).as_deref(), Some("ferris"));
//! assert!(check.equal(|| Some(1), Some(2)).is_none());
//! assert_eq!(sink.borrow().failures()[0].message, "1 did not match 2");
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};
use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::detail::{mapping_detail, sequence_detail};
use crate::outcome::{evaluate, panic_message, IntoOutcome};
use crate::{EvalError, ReportConfig, SharedReporter, SourceLocation};

const NIL: &str = "nil";

/// Issues assertions against one reporter.
///
/// The shorthand methods forward to [`Check`] with no message and the
/// caller's location; use [`Asserter::check`] to attach either.
pub struct Asserter {
    reporter: SharedReporter,
    show_detail: bool,
}

impl Asserter {
    pub fn new(reporter: SharedReporter) -> Self {
        Self::with_config(reporter, ReportConfig::global())
    }

    pub fn with_config(reporter: SharedReporter, config: &ReportConfig) -> Self {
        Self {
            reporter,
            show_detail: config.show_detail,
        }
    }

    pub fn reporter(&self) -> &SharedReporter {
        &self.reporter
    }

    /// Starts a single assertion located at the caller.
    #[track_caller]
    pub fn check(&self) -> Check<'_> {
        Check {
            asserter: self,
            message: None,
            location: SourceLocation::caller(),
        }
    }

    #[track_caller]
    pub fn predicate<T, O, F, P>(&self, expression: F, predicate: P) -> Option<T>
    where
        T: Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
        P: FnOnce(&T) -> bool,
    {
        self.check().predicate(expression, predicate)
    }

    #[track_caller]
    pub fn matches<T, U, O, F, M>(&self, expression: F, matcher: M, expected: Option<U>) -> Option<T>
    where
        T: Debug,
        U: Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
        M: FnOnce(&T, &U) -> bool,
    {
        self.check().matches(expression, matcher, expected)
    }

    #[track_caller]
    pub fn matches_curried<T, U, O, F, C, P>(
        &self,
        expression: F,
        curried: C,
        expected: Option<U>,
    ) -> Option<T>
    where
        T: Clone + Debug,
        U: Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
        C: FnOnce(T) -> P,
        P: FnOnce(&U) -> bool,
    {
        self.check().matches_curried(expression, curried, expected)
    }

    #[track_caller]
    pub fn equal<T, O, F>(&self, expression: F, expected: Option<T>) -> Option<T>
    where
        T: PartialEq + Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
    {
        self.check().equal(expression, expected)
    }

    #[track_caller]
    pub fn equal_sequence<T, O, F>(&self, expression: F, expected: Option<Vec<T>>) -> Option<Vec<T>>
    where
        T: PartialEq + Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<Vec<T>>,
    {
        self.check().equal_sequence(expression, expected)
    }

    #[track_caller]
    pub fn equal_mapping<K, V, S, O, F>(
        &self,
        expression: F,
        expected: Option<HashMap<K, V, S>>,
    ) -> Option<HashMap<K, V, S>>
    where
        K: Eq + Hash + Debug,
        V: PartialEq + Debug,
        S: BuildHasher,
        F: FnOnce() -> O,
        O: IntoOutcome<HashMap<K, V, S>>,
    {
        self.check().equal_mapping(expression, expected)
    }

    #[track_caller]
    pub fn absent<T, O, F>(&self, expression: F) -> bool
    where
        T: Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
    {
        self.check().absent(expression)
    }

    #[track_caller]
    pub fn present<T, O, F>(&self, expression: F) -> Option<T>
    where
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
    {
        self.check().present(expression)
    }

    #[track_caller]
    pub fn failure<T>(&self, message: impl Into<String>) -> Option<T> {
        self.check().failure(message)
    }

    #[track_caller]
    pub fn failed(&self, message: impl Into<String>) -> bool {
        self.check().failed(message)
    }
}

/// One pending assertion: a location and an optional trailing message.
pub struct Check<'a> {
    asserter: &'a Asserter,
    message: Option<String>,
    location: SourceLocation,
}

impl<'a> Check<'a> {
    /// Text appended to the failure message, after `". "`.
    pub fn because(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Reports failures against `location` instead of the call site.
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Passes when the value is present and satisfies `predicate`.
    pub fn predicate<T, O, F, P>(self, expression: F, predicate: P) -> Option<T>
    where
        T: Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
        P: FnOnce(&T) -> bool,
    {
        let actual = self.evaluate(expression)?;
        match actual {
            Some(value) => {
                if self.guarded(|| predicate(&value))? {
                    Some(value)
                } else {
                    self.mismatch(format!("{:?} did not satisfy the predicate", value), None)
                }
            }
            None => self.mismatch(format!("{} did not satisfy the predicate", NIL), None),
        }
    }

    /// Compares an optional actual value with an optional expected value.
    ///
    /// Both absent is a match. Exactly one absent is a mismatch regardless of
    /// `matcher`. Both present defers to `matcher`.
    pub fn matches<T, U, O, F, M>(self, expression: F, matcher: M, expected: Option<U>) -> Option<T>
    where
        T: Debug,
        U: Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
        M: FnOnce(&T, &U) -> bool,
    {
        self.compare(expression, matcher, expected, |_, _| None)
    }

    /// [`Check::matches`] with a matcher in receiver-then-operand form, e.g.
    /// `|set: HashSet<i32>| move |n: &i32| set.contains(n)`. The receiver is
    /// a clone of the actual value.
    pub fn matches_curried<T, U, O, F, C, P>(
        self,
        expression: F,
        curried: C,
        expected: Option<U>,
    ) -> Option<T>
    where
        T: Clone + Debug,
        U: Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
        C: FnOnce(T) -> P,
        P: FnOnce(&U) -> bool,
    {
        self.matches(
            expression,
            move |receiver: &T, operand: &U| curried(receiver.clone())(operand),
            expected,
        )
    }

    pub fn equal<T, O, F>(self, expression: F, expected: Option<T>) -> Option<T>
    where
        T: PartialEq + Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
    {
        self.matches(expression, |actual: &T, expected: &T| actual == expected, expected)
    }

    /// Equal length and positionally equal elements.
    pub fn equal_sequence<T, O, F>(self, expression: F, expected: Option<Vec<T>>) -> Option<Vec<T>>
    where
        T: PartialEq + Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<Vec<T>>,
    {
        let show_detail = self.asserter.show_detail;
        self.compare(
            expression,
            |actual: &Vec<T>, expected: &Vec<T>| sequences_equal(actual, expected),
            expected,
            move |actual: &Vec<T>, expected: &Vec<T>| {
                show_detail
                    .then(|| sequence_detail(actual, expected))
                    .flatten()
            },
        )
    }

    /// Same key set and equal values per key. Insertion order is irrelevant.
    pub fn equal_mapping<K, V, S, O, F>(
        self,
        expression: F,
        expected: Option<HashMap<K, V, S>>,
    ) -> Option<HashMap<K, V, S>>
    where
        K: Eq + Hash + Debug,
        V: PartialEq + Debug,
        S: BuildHasher,
        F: FnOnce() -> O,
        O: IntoOutcome<HashMap<K, V, S>>,
    {
        let show_detail = self.asserter.show_detail;
        self.compare(
            expression,
            |actual: &HashMap<K, V, S>, expected: &HashMap<K, V, S>| mappings_equal(actual, expected),
            expected,
            move |actual: &HashMap<K, V, S>, expected: &HashMap<K, V, S>| {
                show_detail
                    .then(|| mapping_detail(actual, expected))
                    .flatten()
            },
        )
    }

    /// True iff the value is absent.
    pub fn absent<T, O, F>(self, expression: F) -> bool
    where
        T: Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
    {
        match self.evaluate(expression) {
            Some(None) => true,
            Some(Some(value)) => {
                self.report(format!("{:?} is not {}", value, NIL), None);
                false
            }
            None => false,
        }
    }

    /// The value, if present.
    pub fn present<T, O, F>(self, expression: F) -> Option<T>
    where
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
    {
        match self.evaluate(expression)? {
            Some(value) => Some(value),
            None => self.mismatch("is nil".to_string(), None),
        }
    }

    /// Reports `message` unconditionally and returns `None`, for use as the
    /// fallback in `value.or_else(|| check.check().failure("no value"))`.
    pub fn failure<T>(self, message: impl Into<String>) -> Option<T> {
        self.mismatch(message.into(), None)
    }

    /// [`Check::failure`] for boolean contexts: reports and returns `false`.
    pub fn failed(self, message: impl Into<String>) -> bool {
        self.report(message.into(), None);
        false
    }

    /// The single primitive behind every comparing assertion.
    fn compare<T, U, O, F, M, D>(
        self,
        expression: F,
        matcher: M,
        expected: Option<U>,
        explain: D,
    ) -> Option<T>
    where
        T: Debug,
        U: Debug,
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
        M: FnOnce(&T, &U) -> bool,
        D: FnOnce(&T, &U) -> Option<String>,
    {
        let actual = self.evaluate(expression)?;
        match (actual, expected) {
            (None, None) => None,
            (Some(actual), Some(expected)) => {
                if self.guarded(|| matcher(&actual, &expected))? {
                    Some(actual)
                } else {
                    let detail = explain(&actual, &expected);
                    self.mismatch(format!("{:?} did not match {:?}", actual, expected), detail)
                }
            }
            (Some(actual), None) => self.mismatch(format!("{:?} did not match {}", actual, NIL), None),
            (None, Some(expected)) => self.mismatch(format!("{} did not match {:?}", NIL, expected), None),
        }
    }

    /// Evaluates the expression. An error is reported here and yields `None`.
    fn evaluate<T, O, F>(&self, expression: F) -> Option<Option<T>>
    where
        F: FnOnce() -> O,
        O: IntoOutcome<T>,
    {
        match evaluate(expression) {
            Ok(value) => Some(value),
            Err(error) => {
                self.caught(error);
                None
            }
        }
    }

    /// Runs a matcher or predicate. A panic is reported the way an erroring
    /// expression is, and yields `None`.
    fn guarded(&self, test: impl FnOnce() -> bool) -> Option<bool> {
        match panic::catch_unwind(AssertUnwindSafe(test)) {
            Ok(verdict) => Some(verdict),
            Err(payload) => {
                self.caught(EvalError::Panicked(panic_message(payload.as_ref())));
                None
            }
        }
    }

    fn caught(&self, error: EvalError) {
        debug!(location = %self.location, %error, "assertion expression failed");
        self.report(format!("caught error: {}", error), None);
    }

    fn mismatch<T>(&self, base: String, detail: Option<String>) -> Option<T> {
        self.report(base, detail);
        None
    }

    fn report(&self, base: String, detail: Option<String>) {
        let mut text = match &self.message {
            Some(message) => format!("{}. {}", base, message),
            None => base,
        };
        if let Some(detail) = detail {
            text.push('\n');
            text.push_str(&detail);
        }
        self.asserter.reporter.report(&text, &self.location, true);
    }
}

fn sequences_equal<T: PartialEq>(actual: &[T], expected: &[T]) -> bool {
    actual.len() == expected.len() && actual.iter().zip(expected).all(|(a, e)| a == e)
}

fn mappings_equal<K, V, S>(actual: &HashMap<K, V, S>, expected: &HashMap<K, V, S>) -> bool
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    actual.len() == expected.len()
        && actual
            .iter()
            .all(|(key, value)| expected.get(key).map_or(false, |other| other == value))
}
