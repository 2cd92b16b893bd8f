//! Errors surfaced by traced, memoized and composed calls

use thiserror::Error;

/// Failure of a single function call
///
/// Every wrapper in this crate propagates these unchanged; none of them
/// retries or converts an error coming out of the wrapped function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    /// The argument tuple of a memoized call cannot be used as a cache key
    #[error("Arguments to memoized function {function} must be hashable")]
    ArgumentsNotHashable { function: String },

    #[error("{function}() takes {expected} positional argument(s) but {found} were given")]
    Arity {
        function: String,
        expected: String,
        found: usize,
    },

    #[error("{function}(): expected {expected}, found {found}")]
    TypeMismatch {
        function: String,
        expected: String,
        found: String,
    },

    /// Namespace lookup found nothing callable under this name
    #[error("'{name}' is not a callable namespace entry")]
    NotCallable { name: String },

    /// Failure raised by a function body itself
    #[error("{function}: {message}")]
    Raised { function: String, message: String },
}

impl CallError {
    /// Build a `Raised` error from inside a function body
    pub fn raised(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Raised {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn type_mismatch(
        function: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            function: function.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Result alias used by every callable in the crate
pub type Result<T> = std::result::Result<T, CallError>;
