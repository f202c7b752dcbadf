//! Deferred evaluation of the expression under test.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::EvalError;

/// The normalised result of evaluating an assertion's expression.
pub type Outcome<T> = Result<Option<T>, EvalError>;

/// Return types an assertion expression may have.
pub trait IntoOutcome<T> {
    fn into_outcome(self) -> Outcome<T>;
}

impl<T> IntoOutcome<T> for Option<T> {
    fn into_outcome(self) -> Outcome<T> {
        Ok(self)
    }
}

impl<T, E: fmt::Display> IntoOutcome<T> for Result<Option<T>, E> {
    fn into_outcome(self) -> Outcome<T> {
        self.map_err(|error| EvalError::Raised(error.to_string()))
    }
}

/// Runs `expression` once. A returned `Err` and a panic both become an
/// [`EvalError`]; neither escapes.
///
/// The panic hook still runs before the panic is caught, so the default hook
/// prints its `thread '..' panicked at` line to stderr. Tests that provoke
/// panics on purpose can install a quiet hook with [`std::panic::set_hook`].
pub fn evaluate<T, O, F>(expression: F) -> Outcome<T>
where
    F: FnOnce() -> O,
    O: IntoOutcome<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(expression)) {
        Ok(output) => output.into_outcome(),
        Err(payload) => Err(EvalError::Panicked(panic_message(payload.as_ref()))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
