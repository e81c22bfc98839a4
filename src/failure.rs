//! Assertion failure taxonomy.
//!
//! Every check that does not hold produces one [`Failure`]. Failures are reported
//! to the bound test run; they are never returned as `Err` or raised as panics.

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, Diagnostic, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Failure {
    #[error("(assertion) {description}")]
    #[diagnostic(code(testutil::ok))]
    Condition { description: String },

    #[error("{description}\nexpected error with substring {expected:?}\n(no error)")]
    #[diagnostic(code(testutil::err::missing))]
    MissingError {
        description: String,
        expected: String,
    },

    #[error(
        "{description}\nExpected error to contain substring {expected:?} (case-insensitive)\nGot {actual:?}"
    )]
    #[diagnostic(code(testutil::err::mismatch))]
    ErrorMismatch {
        description: String,
        expected: String,
        actual: String,
    },

    #[error("{description}; error: {error}")]
    #[diagnostic(code(testutil::err::unexpected))]
    UnexpectedError { description: String, error: String },

    #[error("{description}\nvalue1: {left}\nvalue2: {right}")]
    #[diagnostic(code(testutil::eq::mismatch))]
    ValueMismatch {
        description: String,
        left: String,
        right: String,
        #[help]
        diff: Option<String>,
    },

    #[error("{description}; types differ:\nvalue1: {left}\nvalue2: {right}")]
    #[diagnostic(code(testutil::eq::types))]
    TypeMismatch {
        description: String,
        left: String,
        right: String,
    },

    #[error("{description}; can not compare values of type {type_name}")]
    #[diagnostic(
        code(testutil::eq::unsupported),
        help("wrap only comparable data in the values passed to eq")
    )]
    Unsupported {
        description: String,
        type_name: String,
    },

    #[error("expected panic (but there was no panic)")]
    #[diagnostic(code(testutil::panic::none))]
    NoPanic { expected: String },

    #[error("expected panic to match {expected:?} but got {actual:?}")]
    #[diagnostic(code(testutil::panic::mismatch))]
    PanicMismatch { expected: String, actual: String },

    #[error("invalid panic pattern {pattern:?}: {reason}")]
    #[diagnostic(code(testutil::panic::pattern))]
    InvalidPattern { pattern: String, reason: String },

    #[error("test panicked: {message}")]
    #[diagnostic(code(testutil::panic::unexpected))]
    UnexpectedPanic { message: String },
}

impl Failure {
    /// Diagnostic code, e.g. `testutil::eq::mismatch`.
    pub fn code_str(&self) -> String {
        Diagnostic::code(self)
            .map(|code| code.to_string())
            .unwrap_or_default()
    }

    /// The caller-supplied description, for failures that carry one.
    pub fn description(&self) -> Option<&str> {
        match self {
            Failure::Condition { description }
            | Failure::MissingError { description, .. }
            | Failure::ErrorMismatch { description, .. }
            | Failure::UnexpectedError { description, .. }
            | Failure::ValueMismatch { description, .. }
            | Failure::TypeMismatch { description, .. }
            | Failure::Unsupported { description, .. } => Some(description),
            Failure::NoPanic { .. }
            | Failure::PanicMismatch { .. }
            | Failure::InvalidPattern { .. }
            | Failure::UnexpectedPanic { .. } => None,
        }
    }

    pub fn diff(&self) -> Option<&str> {
        match self {
            Failure::ValueMismatch { diff, .. } => diff.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_check_kind() {
        let failure = Failure::Condition {
            description: "1+2=3".to_string(),
        };
        assert_eq!(failure.code_str(), "testutil::ok");
        assert_eq!(failure.to_string(), "(assertion) 1+2=3");
        assert_eq!(failure.description(), Some("1+2=3"));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let failure = Failure::PanicMismatch {
            expected: "x".to_string(),
            actual: "y".to_string(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "panic_mismatch");
        assert_eq!(json["actual"], "y");
        assert!(failure.description().is_none());
    }
}
