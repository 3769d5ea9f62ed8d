//! # Cart Configuration
//!
//! Configuration management for the cart store.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GOMARKET_NAMESPACE=@GoMarketplace                                  │
//! │     GOMARKET_DB_PATH=/tmp/cart.db                                      │
//! │     GOMARKET_HYDRATION=strict                                          │
//! │     GOMARKET_QUEUE_CAPACITY=64                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/gomarketplace/cart.toml (Linux)                          │
//! │     ~/Library/Application Support/com.gomarketplace.cart/cart.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     namespace "@GoMarketplace", lenient hydration, queue 32            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cart.toml
//! [storage]
//! namespace = "@GoMarketplace"
//! database_path = "/var/lib/gomarketplace/cart.db"
//!
//! [cart]
//! queue_capacity = 32
//! hydration = "lenient"  # lenient | strict
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use market_core::{storage_key, DEFAULT_NAMESPACE};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Hydration Policy
// =============================================================================

/// What to do when the stored snapshot cannot be decoded.
///
/// ```text
/// LENIENT (Default)                     STRICT
/// ─────────────────                     ──────
/// • Log a warning                       • hydrate() returns HydrationDecode
/// • Start from an empty cart            • Cart stays empty
/// • Stored blob is overwritten by       • Mutations fail with HydrationDecode
///   the next successful mutation          until hydrate() has been called;
///                                         after that the next mutation
///                                         overwrites the stored blob
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HydrationPolicy {
    #[default]
    Lenient,
    Strict,
}

impl std::fmt::Display for HydrationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HydrationPolicy::Lenient => write!(f, "lenient"),
            HydrationPolicy::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for HydrationPolicy {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(HydrationPolicy::Lenient),
            "strict" => Ok(HydrationPolicy::Strict),
            other => Err(StoreError::InvalidConfig(format!(
                "Unknown hydration policy: '{}'. Valid options: lenient, strict",
                other
            ))),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Key namespace; the snapshot lives at `"<namespace>:products"`.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// SQLite file. Falls back to the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            namespace: default_namespace(),
            database_path: None,
        }
    }
}

// =============================================================================
// Cart Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSettings {
    /// Pending operations the worker queue holds before callers wait.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Decode-failure behaviour on hydration.
    #[serde(default)]
    pub hydration: HydrationPolicy,
}

fn default_queue_capacity() -> usize {
    32
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            queue_capacity: default_queue_capacity(),
            hydration: HydrationPolicy::default(),
        }
    }
}

// =============================================================================
// Cart Config
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub cart: CartSettings,
}

impl CartConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.storage.namespace.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "storage.namespace must not be empty".into(),
            ));
        }

        // tokio's mpsc rejects a zero-capacity channel.
        if self.cart.queue_capacity == 0 {
            return Err(StoreError::InvalidConfig(
                "cart.queue_capacity must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(namespace) = lookup("GOMARKET_NAMESPACE") {
            debug!(namespace = %namespace, "Overriding namespace from environment");
            self.storage.namespace = namespace;
        }

        if let Some(path) = lookup("GOMARKET_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(policy) = lookup("GOMARKET_HYDRATION") {
            match policy.parse() {
                Ok(parsed) => self.cart.hydration = parsed,
                Err(_) => warn!(policy = %policy, "Unknown hydration policy in environment"),
            }
        }

        if let Some(capacity) = lookup("GOMARKET_QUEUE_CAPACITY") {
            match capacity.parse::<usize>() {
                Ok(c) => self.cart.queue_capacity = c,
                Err(_) => warn!(capacity = %capacity, "Invalid queue capacity in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "gomarketplace", "cart")
            .map(|dirs| dirs.config_dir().join("cart.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the snapshot key, e.g. `"@GoMarketplace:products"`.
    pub fn storage_key(&self) -> String {
        storage_key(&self.storage.namespace)
    }

    /// Returns the SQLite path: explicit setting, else the platform data dir.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.storage.database_path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "gomarketplace", "cart")
                .map(|dirs| dirs.data_dir().join("cart.db"))
        })
    }

    /// Returns the hydration policy.
    pub fn hydration(&self) -> HydrationPolicy {
        self.cart.hydration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_hydration_policy_parsing() {
        assert_eq!("lenient".parse::<HydrationPolicy>().unwrap(), HydrationPolicy::Lenient);
        assert_eq!("STRICT".parse::<HydrationPolicy>().unwrap(), HydrationPolicy::Strict);
        assert!("maybe".parse::<HydrationPolicy>().is_err());
        assert!("empty".parse::<HydrationPolicy>().is_err());
        assert!("fail".parse::<HydrationPolicy>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key(), "@GoMarketplace:products");
        assert_eq!(config.cart.queue_capacity, 32);
        assert_eq!(config.hydration(), HydrationPolicy::Lenient);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CartConfig::default();

        config.storage.namespace = "  ".to_string();
        assert!(config.validate().unwrap_err().is_config_error());

        config.storage.namespace = "@Test".to_string();
        config.cart.queue_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CartConfig = toml::from_str(
            r#"
            [cart]
            hydration = "strict"
            "#,
        )
        .unwrap();

        assert_eq!(config.hydration(), HydrationPolicy::Strict);
        assert_eq!(config.storage.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.cart.queue_capacity, 32);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GOMARKET_NAMESPACE", "@Staging"),
            ("GOMARKET_DB_PATH", "/tmp/staging-cart.db"),
            ("GOMARKET_HYDRATION", "strict"),
            ("GOMARKET_QUEUE_CAPACITY", "8"),
        ]
        .into_iter()
        .collect();

        let mut config = CartConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage_key(), "@Staging:products");
        assert_eq!(
            config.database_path(),
            Some(PathBuf::from("/tmp/staging-cart.db"))
        );
        assert_eq!(config.hydration(), HydrationPolicy::Strict);
        assert_eq!(config.cart.queue_capacity, 8);
    }

    #[test]
    fn test_invalid_overrides_keep_current_values() {
        let vars: HashMap<&str, &str> = [
            ("GOMARKET_HYDRATION", "sometimes"),
            ("GOMARKET_QUEUE_CAPACITY", "lots"),
        ]
        .into_iter()
        .collect();

        let mut config = CartConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.hydration(), HydrationPolicy::Lenient);
        assert_eq!(config.cart.queue_capacity, 32);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "gomarket-config-{}/cart.toml",
            std::process::id()
        ));

        let mut config = CartConfig::default();
        config.storage.namespace = "@RoundTrip".to_string();
        config.cart.hydration = HydrationPolicy::Strict;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[storage]"));
        assert!(contents.contains("[cart]"));

        let loaded: CartConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.storage.namespace, "@RoundTrip");
        assert_eq!(loaded.hydration(), HydrationPolicy::Strict);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
