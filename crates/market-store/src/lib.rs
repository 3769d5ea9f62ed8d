//! # market-store: Persistent Cart Store for GoMarketplace
//!
//! This crate keeps the shopping cart in memory, mirrors it to a key-value
//! store after every change, and restores it on startup.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     GoMarketplace Cart Data Flow                        │
//! │                                                                         │
//! │  UI (dashboard, cart page, header badge)                               │
//! │       │  add_to_cart / increment / decrement / subscribe               │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  market-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  CartHandle   │    │   CartStore   │    │ KeyValueStore│  │   │
//! │  │   │ (cart_store)  │───►│    worker     │───►│    (kv.rs)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ mpsc + watch  │    │ market-core   │    │ MemoryStore  │  │   │
//! │  │   │               │    │ transitions   │    │ SqliteStore  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   kv_store table, key "@GoMarketplace:products"                 │   │
//! │  │   ~/.local/share/cart/cart.db                                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`cart_store`] - Single-writer cart worker and its handle
//! - [`kv`] - Key-value trait and the in-memory backend
//! - [`sqlite`] - SQLite backend
//! - [`migrations`] - Embedded database migrations
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use market_store::{CartConfig, CartStore, SqliteConfig, SqliteStore};
//!
//! let config = CartConfig::load_or_default(None);
//! let kv = SqliteStore::open(SqliteConfig::new("cart.db")).await?;
//!
//! let cart = CartStore::new(kv, &config).start();
//! cart.hydrate().await?;
//!
//! let _badge = cart.subscribe(|c| println!("{} items", c.total_quantity()));
//! cart.add_to_cart(CatalogItem::new("p1", "Mug", "mug.png", 12.5)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart_store;
pub mod config;
pub mod error;
pub mod kv;
pub mod migrations;
pub mod sqlite;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart_store::{CartHandle, CartStore, Subscription};
pub use config::{CartConfig, HydrationPolicy};
pub use error::{AccessOp, StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryStore};
pub use sqlite::{SqliteConfig, SqliteStore};
