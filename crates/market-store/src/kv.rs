//! # Key-Value Storage
//!
//! The persistence seam of the cart store.
//!
//! The store only ever needs two calls against a single key, so any durable
//! string map works as a backend:
//!
//! - [`MemoryStore`] - in-process map, for tests and ephemeral sessions
//! - [`crate::sqlite::SqliteStore`] - durable SQLite table
//!
//! Writes overwrite; there is no versioning or compare-and-swap. The cart
//! store is the only writer of its key.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AccessOp, StoreError, StoreResult};

/// Asynchronous string key-value store.
///
/// Implementations must be `Send + Sync`; the cart worker holds one behind
/// a `Box<dyn KeyValueStore>`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    async fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> StoreResult<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).write(key, value).await
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// An in-memory implementation of [`KeyValueStore`].
///
/// Data is lost when the store is dropped. Reads and writes can be made to
/// fail, and writes can be slowed down, to exercise the cart store's
/// failure and ordering paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_delay_ms: AtomicU64,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a key.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.get_mut().insert(key.into(), value.into());
        self
    }

    /// Makes every subsequent read fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delays each write by `delay` before it lands.
    pub fn set_write_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.write_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of writes that landed.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Reads a key, bypassing injected failures.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::access(AccessOp::Read, key, "injected read failure"));
        }

        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let delay = self.write_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::access(AccessOp::Write, key, "injected write failure"));
        }

        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.read("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let store = MemoryStore::new();
        store.write("k", "one").await.unwrap();
        store.write("k", "two").await.unwrap();

        assert_eq!(store.read("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryStore::new().with_entry("k", "v");

        store.set_fail_reads(true);
        let err = store.read("k").await.unwrap_err();
        assert!(err.is_access_error());

        store.set_fail_writes(true);
        assert!(store.write("k", "new").await.is_err());
        assert_eq!(store.peek("k").await.as_deref(), Some("v"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_write_delay_is_applied() {
        let store = MemoryStore::new();
        store.set_write_delay(Duration::from_millis(30));

        let started = std::time::Instant::now();
        store.write("k", "v").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));

        store.set_write_delay(Duration::MAX);
        assert_eq!(store.write_delay_ms.load(Ordering::SeqCst), u64::MAX);
    }

    #[tokio::test]
    async fn test_arc_delegates() {
        let store = Arc::new(MemoryStore::new());
        let boxed: Box<dyn KeyValueStore> = Box::new(store.clone());

        boxed.write("k", "v").await.unwrap();
        assert_eq!(store.peek("k").await.as_deref(), Some("v"));
    }
}
