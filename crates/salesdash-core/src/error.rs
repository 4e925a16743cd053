//! Error types for salesdash-core
//!
//! Every failure the query service or the seed loader can produce maps to an
//! [`ErrorCode`], which the HTTP layer turns into a status code and a
//! structured body.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or malformed request parameter
    InvalidParameter,
    /// Seed feed could not be fetched
    FeedUnavailable,
    /// Seed feed payload could not be decoded
    MalformedFeed,
    /// Store read or write failed
    StoreError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::InvalidParameter => write!(f, "INVALID_PARAMETER"),
            ErrorCode::FeedUnavailable => write!(f, "FEED_UNAVAILABLE"),
            ErrorCode::MalformedFeed => write!(f, "MALFORMED_FEED"),
            ErrorCode::StoreError => write!(f, "STORE_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Underlying cause, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach the underlying cause
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details = Some(detail.into());
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        Ok(())
    }
}

/// Main error type for salesdash-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{message}")]
    InvalidParameter { message: String },

    #[error("Feed unavailable: {message}")]
    FeedUnavailable { message: String },

    #[error("Malformed feed payload: {message}")]
    MalformedFeed { message: String },

    #[error("Store error: {message}")]
    StoreError { message: String },
}

impl CoreError {
    /// Shorthand for a validation failure
    pub fn invalid(message: impl Into<String>) -> Self {
        CoreError::InvalidParameter { message: message.into() }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            CoreError::FeedUnavailable { .. } => ErrorCode::FeedUnavailable,
            CoreError::MalformedFeed { .. } => ErrorCode::MalformedFeed,
            CoreError::StoreError { .. } => ErrorCode::StoreError,
        }
    }

    /// Convert to detailed error info, using `context` as the headline for
    /// upstream failures and keeping the cause in `details`
    pub fn to_details(&self, context: &str) -> ErrorDetails {
        match self {
            CoreError::InvalidParameter { message } => {
                ErrorDetails::new(self.code(), message.clone())
            }
            _ => ErrorDetails::new(self.code(), context).with_detail(self.to_string()),
        }
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        CoreError::StoreError { message: err.to_string() }
    }
}

impl From<sea_query::error::Error> for CoreError {
    fn from(err: sea_query::error::Error) -> Self {
        CoreError::StoreError { message: err.to_string() }
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CoreError::MalformedFeed { message: err.to_string() }
        } else {
            CoreError::FeedUnavailable { message: err.to_string() }
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::MalformedFeed { message: err.to_string() }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;
