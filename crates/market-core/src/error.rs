//! # Error Types
//!
//! Domain-specific error types for market-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  market-core errors (this file)                                        │
//! │  ├── CoreError        - Snapshot encode/decode failures                │
//! │  └── ValidationError  - Snapshot violates cart invariants              │
//! │                                                                         │
//! │  market-store errors (separate crate)                                  │
//! │  └── StoreError       - Storage access, hydration, worker failures     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → caller / UI          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, index, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core cart errors.
///
/// Cart transitions themselves never fail; these errors only come from
/// crossing the persistence boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The stored snapshot is not a JSON array of line items.
    ///
    /// ## When This Occurs
    /// - Truncated or hand-edited storage value
    /// - A field has the wrong type (e.g. `"quantity": "two"`)
    /// - A required field is missing
    #[error("Malformed cart snapshot: {0}")]
    MalformedSnapshot(String),

    /// The cart could not be serialized.
    #[error("Failed to encode cart snapshot: {0}")]
    Encode(String),

    /// Snapshot parsed but breaks a cart invariant.
    #[error("Invalid cart snapshot: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Invariant violations found while validating a decoded snapshot.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// An item has an empty id.
    #[error("item at index {index} has an empty id")]
    EmptyId { index: usize },

    /// Two items share the same id.
    #[error("duplicate item id '{id}'")]
    DuplicateId { id: String },

    /// An item holds zero units.
    #[error("item '{id}' has quantity 0")]
    ZeroQuantity { id: String },

    /// Price is NaN or infinite.
    #[error("item '{id}' has a non-finite price")]
    NonFinitePrice { id: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            CoreError::Encode(err.to_string())
        } else {
            CoreError::MalformedSnapshot(err.to_string())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::DuplicateId {
            id: "p1".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate item id 'p1'");

        let err = ValidationError::EmptyId { index: 3 };
        assert_eq!(err.to_string(), "item at index 3 has an empty id");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::ZeroQuantity {
            id: "p1".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(
            core_err.to_string(),
            "Invalid cart snapshot: item 'p1' has quantity 0"
        );
    }

    #[test]
    fn test_json_error_is_malformed_snapshot() {
        let err = serde_json::from_str::<Vec<u32>>("[1,").unwrap_err();
        assert!(matches!(CoreError::from(err), CoreError::MalformedSnapshot(_)));
    }
}
