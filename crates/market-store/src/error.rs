//! # Store Error Types
//!
//! Error types for cart store and storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / MemoryStore fault / serde_json::Error                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError::Access ← read/write failed, cart NOT updated              │
//! │                                                                         │
//! │  market_core::CoreError (bad snapshot)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError::HydrationDecode ← strict policy only; lenient logs + empty│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller of add_to_cart / increment / decrement / hydrate               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use market_core::CoreError;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Which side of the key-value store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOp {
    Read,
    Write,
    Encode,
}

impl fmt::Display for AccessOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessOp::Read => write!(f, "read"),
            AccessOp::Write => write!(f, "write"),
            AccessOp::Encode => write!(f, "encode"),
        }
    }
}

/// Cart store error type.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// The key-value store could not read or write the snapshot.
    ///
    /// ## When This Occurs
    /// - Database file locked, missing, or disk full
    /// - Pool closed during shutdown
    /// - Snapshot could not be serialized
    #[error("Storage {op} failed for '{key}': {reason}")]
    Access {
        op: AccessOp,
        key: String,
        reason: String,
    },

    /// The stored snapshot is not a valid cart.
    #[error("Failed to decode stored cart: {0}")]
    HydrationDecode(#[source] CoreError),

    /// Database connection could not be established.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid cart configuration.
    #[error("Invalid cart configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Worker Errors
    // =========================================================================
    /// The cart worker has stopped.
    #[error("Cart store is shutting down")]
    ShuttingDown,
}

impl StoreError {
    /// Creates an access error with context.
    pub fn access(op: AccessOp, key: impl Into<String>, reason: impl fmt::Display) -> Self {
        StoreError::Access {
            op,
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if storage could not be read or written.
    pub fn is_access_error(&self) -> bool {
        matches!(self, StoreError::Access { .. })
    }

    /// Returns true if the stored snapshot was rejected.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, StoreError::HydrationDecode(_))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidConfig(_)
                | StoreError::ConfigLoadFailed(_)
                | StoreError::ConfigSaveFailed(_)
        )
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_error_display() {
        let err = StoreError::access(AccessOp::Write, "@GoMarketplace:products", "disk full");
        assert_eq!(
            err.to_string(),
            "Storage write failed for '@GoMarketplace:products': disk full"
        );
        assert!(err.is_access_error());
        assert!(!err.is_decode_error());
    }

    #[test]
    fn test_error_categories() {
        let decode = StoreError::HydrationDecode(CoreError::MalformedSnapshot("eof".into()));
        assert!(decode.is_decode_error());
        assert!(!decode.is_config_error());

        assert!(StoreError::InvalidConfig("queue".into()).is_config_error());
        assert!(!StoreError::ShuttingDown.is_access_error());
    }
}
