//! The assertion context and the panic-recovery wrapper.
//!
//! ```rust
//! use testutil::{recover_as_fail, Assert, Recorder, TestRun};
//!
//! let mut run = Recorder::new("parse");
//! recover_as_fail(&mut run, |run| {
//!     let mut assert = Assert::new(run);
//!     assert.err("bad input is rejected", "abc123", Some(&"An error abc123!"));
//!     assert.no_err("good input", None::<&String>);
//! });
//! assert!(!run.failed());
//! ```

use std::fmt::Display;

use regex::RegexBuilder;

use crate::compare::{compare, Comparison};
use crate::failure::Failure;
use crate::output::render_diff;
use crate::panic::{call_site_backtrace, run_guarded};
use crate::repr::repr_value;
use crate::run::TestRun;
use crate::value::Reflect;

/// Assertion methods bound to one test run.
///
/// Each method returns whether the check held. A failed check is reported to
/// the run, which marks the test failed; the test itself keeps going.
pub struct Assert<'r, R: TestRun + ?Sized> {
    run: &'r mut R,
}

impl<'r, R: TestRun + ?Sized> Assert<'r, R> {
    pub fn new(run: &'r mut R) -> Self {
        Self { run }
    }

    /// The bound test run.
    pub fn run(&mut self) -> &mut R {
        &mut *self.run
    }

    /// Checks a precomputed condition.
    pub fn ok(&mut self, description: impl Display, ok: bool) -> bool {
        if !ok {
            self.report(Failure::Condition {
                description: description.to_string(),
            });
        }
        ok
    }

    /// Checks that an error is present and that its message contains `expected`,
    /// ignoring case.
    pub fn err<E: Display + ?Sized>(
        &mut self,
        description: impl Display,
        expected: &str,
        err: Option<&E>,
    ) -> bool {
        let Some(err) = err else {
            self.report(Failure::MissingError {
                description: description.to_string(),
                expected: expected.to_string(),
            });
            return false;
        };

        let actual = err.to_string();
        if !actual.to_lowercase().contains(&expected.to_lowercase()) {
            self.report(Failure::ErrorMismatch {
                description: description.to_string(),
                expected: expected.to_string(),
                actual,
            });
            return false;
        }
        true
    }

    /// [`err`](Self::err) on the error side of a `Result`.
    pub fn err_result<T, E: Display>(
        &mut self,
        description: impl Display,
        expected: &str,
        result: &Result<T, E>,
    ) -> bool {
        self.err(description, expected, result.as_ref().err())
    }

    /// Checks that no error is present.
    pub fn no_err<E: Display + ?Sized>(
        &mut self,
        description: impl Display,
        err: Option<&E>,
    ) -> bool {
        match err {
            None => true,
            Some(err) => {
                self.report(Failure::UnexpectedError {
                    description: description.to_string(),
                    error: err.to_string(),
                });
                false
            }
        }
    }

    /// [`no_err`](Self::no_err) on the error side of a `Result`.
    pub fn no_err_result<T, E: Display>(
        &mut self,
        description: impl Display,
        result: &Result<T, E>,
    ) -> bool {
        self.no_err(description, result.as_ref().err())
    }

    /// Checks two values for equality. See [`compare`] for the rules.
    pub fn eq<A, B>(&mut self, description: impl Display, left: &A, right: &B) -> bool
    where
        A: Reflect + ?Sized,
        B: Reflect + ?Sized,
    {
        let (left, right) = (left.reflect(), right.reflect());
        match compare(&left, &right) {
            Comparison::Equal => {
                tracing::trace!(test = self.run.name(), "values equal");
                true
            }
            Comparison::NotEqual => {
                let (left, right) = (repr_value(&left), repr_value(&right));
                let diff = if self.run.config().show_diff {
                    render_diff(&left, &right)
                } else {
                    None
                };
                self.report(Failure::ValueMismatch {
                    description: description.to_string(),
                    left,
                    right,
                    diff,
                });
                false
            }
            Comparison::TypesDiffer { left, right } => {
                self.report(Failure::TypeMismatch {
                    description: description.to_string(),
                    left,
                    right,
                });
                false
            }
            Comparison::Unsupported { type_name } => {
                self.report(Failure::Unsupported {
                    description: description.to_string(),
                    type_name,
                });
                false
            }
        }
    }

    /// Checks that `f` panics with a message matching `expected`, a regular
    /// expression applied case-insensitively.
    ///
    /// An invalid pattern is reported as a failure and `f` is not called.
    pub fn panic<F: FnOnce()>(&mut self, expected: &str, f: F) -> bool {
        let pattern = match RegexBuilder::new(expected).case_insensitive(true).build() {
            Ok(pattern) => pattern,
            Err(e) => {
                self.report(Failure::InvalidPattern {
                    pattern: expected.to_string(),
                    reason: e.to_string(),
                });
                return false;
            }
        };

        let capture = self.run.config().capture_backtraces;
        match run_guarded(capture, f) {
            Ok(()) => {
                if capture {
                    self.log_backtrace(&call_site_backtrace());
                }
                self.report(Failure::NoPanic {
                    expected: expected.to_string(),
                });
                false
            }
            Err(caught) if pattern.is_match(&caught.message) => {
                tracing::trace!(test = self.run.name(), message = %caught.message, "panic matched");
                true
            }
            Err(caught) => {
                if let Some(trace) = &caught.backtrace {
                    self.log_backtrace(trace);
                }
                self.report(Failure::PanicMismatch {
                    expected: expected.to_string(),
                    actual: caught.message,
                });
                false
            }
        }
    }

    fn log_backtrace(&mut self, trace: &str) {
        tracing::debug!(test = self.run.name(), backtrace = %trace);
        self.run.log(trace);
    }

    fn report(&mut self, failure: Failure) {
        report(&mut *self.run, failure);
    }
}

fn report<R: TestRun + ?Sized>(run: &mut R, failure: Failure) {
    tracing::error!(
        test = run.name(),
        code = %failure.code_str(),
        description = failure.description().unwrap_or_default(),
        "{failure}"
    );
    run.report(failure);
}

/// Runs a test body, converting a panic into a reported failure.
///
/// The payload and the backtrace recorded at panic time are logged, the test is
/// marked failed and `None` is returned. The panic does not propagate.
pub fn recover_as_fail<R, T, F>(run: &mut R, body: F) -> Option<T>
where
    R: TestRun + ?Sized,
    F: FnOnce(&mut R) -> T,
{
    let capture = run.config().capture_backtraces;
    match run_guarded(capture, || body(&mut *run)) {
        Ok(value) => Some(value),
        Err(caught) => {
            run.log(&caught.message);
            if let Some(trace) = &caught.backtrace {
                tracing::debug!(test = run.name(), backtrace = %trace);
                run.log(trace);
            }
            report(
                run,
                Failure::UnexpectedPanic {
                    message: caught.message,
                },
            );
            None
        }
    }
}
