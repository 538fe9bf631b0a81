//! # Validation Module
//!
//! Submission rules checked before anything reaches the backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Session services (swiftlane-client)                          │
//! │  ├── Collect the user's selections                                     │
//! │  └── Call into THIS MODULE before any request                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required selections (user, driver, restaurant)                    │
//! │  ├── Required text (source, destination)                               │
//! │  └── Fare override parsing                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Whatever it enforces (nothing we rely on)                         │
//! │                                                                         │
//! │  A failed check never mutates session state                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use swiftlane_core::money::Money;
//! use swiftlane_core::validation::parse_fare_override;
//!
//! assert_eq!(parse_fare_override(Some("  ")), Ok(None));
//! assert_eq!(parse_fare_override(Some("300")), Ok(Some(Money::from_major_minor(300, 0))));
//! assert!(parse_fare_override(Some("cheap")).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Resource;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Selection Validators
// =============================================================================

/// Unwraps a required selection (user, driver, restaurant).
///
/// ## Example
/// ```rust
/// use swiftlane_core::validation::require;
///
/// assert_eq!(require(Some(3), "user"), Ok(3));
/// assert!(require::<i64>(None, "driver").is_err());
/// ```
pub fn require<T>(selection: Option<T>, field: &str) -> ValidationResult<T> {
    selection.ok_or_else(|| ValidationError::required(field))
}

/// Validates required free text and returns it trimmed.
pub fn require_text<'a>(text: Option<&'a str>, field: &str) -> ValidationResult<&'a str> {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(ValidationError::required(field)),
    }
}

/// Rejects creation requests for resources the backend treats as read-only.
pub fn ensure_creatable(resource: Resource) -> ValidationResult<()> {
    if resource.is_creatable() {
        return Ok(());
    }

    Err(ValidationError::NotAllowed {
        field: "resource".to_string(),
        allowed: Resource::ALL
            .iter()
            .filter(|r| r.is_creatable())
            .map(|r| r.name().to_string())
            .collect(),
    })
}

// =============================================================================
// Fare Override
// =============================================================================

/// Parses the manual fare field of the booking form.
///
/// ## Rules
/// - Absent or blank: no override (the estimator runs)
/// - Otherwise: a finite decimal rupee amount
/// - Negative amounts are rejected
pub fn parse_fare_override(text: Option<&str>) -> ValidationResult<Option<Money>> {
    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(None),
    };

    let value: f64 = text.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "fare".to_string(),
        reason: format!("'{}' is not a number", text),
    })?;

    if value < 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "fare".to_string(),
        });
    }

    Money::from_decimal(value)
        .map(Some)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "fare".to_string(),
            reason: "not a finite amount".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
