//! # Error Types
//!
//! Domain-specific error types for resto-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  resto-core errors (this file)                                         │
//! │  └── ValidationError  - malformed input, rejected before persistence   │
//! │                                                                         │
//! │  resto-db errors (separate crate)                                      │
//! │  └── DbError          - storage failures, conflicts, preconditions     │
//! │                                                                         │
//! │  HTTP API errors (in apps/server)                                      │
//! │  └── ApiError         - status-code mapping, what the client sees      │
//! │                                                                         │
//! │  Flow: ValidationError → ApiError(400) / DbError → ApiError(4xx/5xx)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, offending value)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements. They are
/// reported synchronously with a 4xx-class status and never retried;
/// nothing is persisted when validation fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A monetary amount or quantity that must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// A quantity that must be at least one.
    #[error("{field} must be a positive integer")]
    MustBePositive { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Collection exceeds the allowed size.
    #[error("{field} cannot have more than {max} entries")]
    TooMany { field: String, max: usize },

    /// A monetary amount beyond what the system accepts.
    #[error("{field} must be at most {max}")]
    AmountTooLarge { field: String, max: Money },

    /// Invalid format (e.g., malformed date key).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Caller-supplied order total disagrees with the server-side
    /// recomputation from line items. Rejected instead of trusted, so a
    /// tampering client cannot under-charge.
    #[error("total {supplied} does not match computed total {computed}")]
    TotalMismatch { supplied: Money, computed: Money },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items is required");

        let err = ValidationError::MustBeNonNegative {
            field: "openingAmount".to_string(),
        };
        assert_eq!(err.to_string(), "openingAmount must not be negative");

        let err = ValidationError::TotalMismatch {
            supplied: Money::from_cents(10000),
            computed: Money::from_cents(25000),
        };
        assert_eq!(
            err.to_string(),
            "total Rp 10.000 does not match computed total Rp 25.000"
        );
    }
}
