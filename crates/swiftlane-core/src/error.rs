//! # Error Types
//!
//! Domain-specific error types for swiftlane-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  swiftlane-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Missing/invalid input before submission        │
//! │  └── DataShapeError   - Malformed backend field (substituted, not      │
//! │                         propagated)                                    │
//! │                                                                         │
//! │  swiftlane-client errors (separate crate)                              │
//! │  └── ClientError      - Transport, status, decode, config              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → user message        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation messages name the form field (`user`, `restaurant`, `fare`)
//! because the client shows them to the user as-is.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by swiftlane-core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Fare schedule is inconsistent (negative rate, inverted range).
    #[error("Invalid fare schedule: {reason}")]
    InvalidFareSchedule { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before anything is sent to the backend. No local state is mutated
/// when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric fare).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Order submission with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Data Shape Error
// =============================================================================

/// A backend field that is absent or malformed.
///
/// Decoding never fails a whole record (or list) for one of these: the field
/// is substituted with a neutral value and the problem is dropped. The type
/// exists so the parsing helpers have a typed failure to return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataShapeError {
    /// Field is missing or JSON null.
    #[error("field is absent")]
    Absent,

    /// Field is a string that does not parse as the expected kind.
    #[error("'{value}' is not a valid {expected}")]
    Unparseable { expected: &'static str, value: String },

    /// Field has the wrong JSON type entirely (array, object, bool, ...).
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
