//! Shared primitives for all Rust crates in Tessera.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across Tessera crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated or not allowed to access a resource.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A backing store could not be reached; the outcome is unknown, not denied.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The caller abandoned the operation before it completed.
    #[error("canceled: {0}")]
    Canceled(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns true for infrastructure failures that say nothing about access.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Canceled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_keeps_original_value() {
        let Ok(value) = NonEmptyString::new(" reports ") else {
            panic!("expected a valid non-empty string");
        };
        assert_eq!(value.as_str(), " reports ");
    }

    #[test]
    fn unavailable_and_canceled_are_transient() {
        assert!(AppError::Unavailable("pool timed out".to_owned()).is_transient());
        assert!(AppError::Canceled("client went away".to_owned()).is_transient());
        assert!(!AppError::Forbidden("denied".to_owned()).is_transient());
        assert!(!AppError::Internal("bug".to_owned()).is_transient());
    }

    #[test]
    fn unavailable_message_names_the_store_failure() {
        let error = AppError::Unavailable("failed to load user".to_owned());
        assert_eq!(error.to_string(), "store unavailable: failed to load user");
    }
}
