//! Unified error types and result handling.

use thiserror::Error;

/// All failure modes surfaced by the crate.
///
/// `Validation` covers malformed input rejected before it reaches storage.
/// `Database` wraps relational-backend failures (unreachable, timed out, or
/// a failed statement); the fallback selector treats any of them as a reason
/// to retry on the file path. `Io` and `Serde` cover the file path itself.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {field} {message}")]
    Validation { field: &'static str, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Notification error: {message}")]
    Notify { message: String },
}

impl Error {
    /// Shorthand for a field-level validation failure.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// True for input errors that must never be retried against a fallback.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
