//! # market-core: Pure Cart Logic for GoMarketplace
//!
//! This crate holds the cart model and every state transition as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     GoMarketplace Cart Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI layer (external)                          │   │
//! │  │    Dashboard ──► add_to_cart     Cart page ──► increment/decr   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartHandle                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 market-store (CartStore worker)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ market-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │ snapshot  │  │ validation│                  │   │
//! │  │   │   Cart    │  │  encode   │  │   rules   │                  │   │
//! │  │   │ LineItem  │  │  decode   │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - LineItem, CatalogItem, Cart, CartOp
//! - [`snapshot`] - Persisted JSON form of a cart
//! - [`validation`] - Snapshot invariant checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use market_core::{snapshot, Cart, CatalogItem};
//!
//! let cart = Cart::new()
//!     .with_added(CatalogItem::new("p1", "Mug", "mug.png", 12.5))
//!     .with_added(CatalogItem::new("p1", "Mug", "mug.png", 12.5));
//!
//! assert_eq!(cart.item_count(), 1);
//! assert_eq!(cart.total_quantity(), 2);
//!
//! let raw = snapshot::encode(&cart).unwrap();
//! assert_eq!(snapshot::decode(&raw).unwrap(), cart);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod snapshot;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Namespace prefix for every key the app writes.
pub const DEFAULT_NAMESPACE: &str = "@GoMarketplace";

/// Suffix of the cart snapshot key within a namespace.
pub const PRODUCTS_KEY_SUFFIX: &str = "products";

/// Storage key of the cart snapshot under the default namespace.
pub const STORAGE_KEY: &str = "@GoMarketplace:products";

/// Builds the snapshot key for a namespace (`"<namespace>:products"`).
pub fn storage_key(namespace: &str) -> String {
    format!("{}:{}", namespace, PRODUCTS_KEY_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_storage_key() {
        assert_eq!(storage_key(DEFAULT_NAMESPACE), STORAGE_KEY);
        assert_eq!(storage_key("@Staging"), "@Staging:products");
    }
}
