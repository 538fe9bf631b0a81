//! # Client Error Types
//!
//! Error types for backend access and session operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Validation    │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  missing user   │  │  refused        │  │  Status (non-2xx)       │ │
//! │  │  empty cart     │  │  timed out      │  │  Decode (not JSON,      │ │
//! │  │  bad fare       │  │  DNS failure    │  │          not a list)    │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │     Config      │   Every variant maps to an ErrorCode and a        │
//! │  │                 │   user-facing message ("Error placing order: …")  │
//! │  │  bad URL / TOML │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed operation never leaves local state half-updated: sessions only
//! mutate after the backend reports success.

use serde::Serialize;
use swiftlane_core::{CoreError, ValidationError};
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering all backend and session failures.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request could not be completed (refused, reset, timed out).
    #[error("Request failed: {0}")]
    Transport(String),

    /// Backend answered with a non-success status.
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not what the endpoint promises.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => ClientError::Validation(v),
            other => ClientError::Config(ConfigError::Invalid(other.to_string())),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ClientError::Status {
                status: status.as_u16(),
                body: String::new(),
            };
        }
        if err.is_decode() {
            return ClientError::Decode(err.to_string());
        }
        if err.is_timeout() {
            return ClientError::Transport("request timed out".to_string());
        }
        ClientError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Config(ConfigError::InvalidUrl(err.to_string()))
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Client configuration is unusable
    ConfigError,

    /// Backend unreachable or too slow
    TransportError,

    /// Backend rejected the request
    BackendError,

    /// Backend sent something unreadable
    DecodeError,
}

impl ClientError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Validation(_) => ErrorCode::ValidationError,
            ClientError::Config(_) => ErrorCode::ConfigError,
            ClientError::Transport(_) => ErrorCode::TransportError,
            ClientError::Status { .. } => ErrorCode::BackendError,
            ClientError::Decode(_) => ErrorCode::DecodeError,
        }
    }

    /// Returns true if the request might succeed when simply repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Message shown to the user for a failed action.
    ///
    /// ## Example
    /// ```rust
    /// use swiftlane_client::ClientError;
    ///
    /// let err = ClientError::Transport("connection refused".to_string());
    /// assert_eq!(
    ///     err.user_message("placing order"),
    ///     "Error placing order: Request failed: connection refused"
    /// );
    /// ```
    pub fn user_message(&self, action: &str) -> String {
        match self {
            ClientError::Validation(v) => validation_message(v),
            other => format!("Error {}: {}", action, other),
        }
    }
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::Required { .. } | ValidationError::EmptyCart => {
            format!("Please complete the form: {}", err)
        }
        other => other.to_string(),
    }
}

/// Serializable error for the console output and any UI layer.
///
/// ```json
/// { "code": "TRANSPORT_ERROR", "message": "Error booking ride: Request failed: ..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorReport {
    pub fn new(err: &ClientError, action: &str) -> Self {
        ErrorReport {
            code: err.code(),
            message: err.user_message(action),
        }
    }
}
