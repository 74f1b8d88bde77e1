//! Cart storage configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GOMARKETPLACE_DATA_DIR` - Directory holding persisted records (default: .gomarketplace)
//! - `GOMARKETPLACE_STORAGE_KEY` - Key of the cart record (default: @GoMarketplace:products)

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::FileStore;

/// Key the cart record is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace:products";

/// Data directory used unless configured otherwise.
pub const DEFAULT_DATA_DIR: &str = ".gomarketplace";

const DATA_DIR_VAR: &str = "GOMARKETPLACE_DATA_DIR";
const STORAGE_KEY_VAR: &str = "GOMARKETPLACE_STORAGE_KEY";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Root directory for the file-backed store
    pub data_dir: PathBuf,
    /// Key the cart record is stored under
    pub storage_key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for an empty data directory or
    /// storage key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = match lookup(DATA_DIR_VAR) {
            Some(dir) if dir.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    DATA_DIR_VAR.to_string(),
                    "must not be empty".to_string(),
                ));
            }
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(DEFAULT_DATA_DIR),
        };

        let storage_key = lookup(STORAGE_KEY_VAR).unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        validate_storage_key(&storage_key, STORAGE_KEY_VAR)?;

        Ok(Self {
            data_dir,
            storage_key,
        })
    }

    /// Replace the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Replace the storage key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the key is empty.
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Result<Self, ConfigError> {
        let storage_key = storage_key.into();
        validate_storage_key(&storage_key, "storage key")?;
        self.storage_key = storage_key;
        Ok(self)
    }

    /// File-backed store rooted at the configured data directory.
    #[must_use]
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.data_dir)
    }
}

fn validate_storage_key(key: &str, name: &str) -> Result<(), ConfigError> {
    if key.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CartConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage_key, "@GoMarketplace:products");
        assert_eq!(config.data_dir, PathBuf::from(".gomarketplace"));
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("GOMARKETPLACE_DATA_DIR", "/var/lib/gm"),
            ("GOMARKETPLACE_STORAGE_KEY", "@Test:cart"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/gm"));
        assert_eq!(config.storage_key, "@Test:cart");
    }

    #[test]
    fn test_empty_key_is_invalid() {
        let result = CartConfig::from_lookup(lookup_from(&[("GOMARKETPLACE_STORAGE_KEY", "  ")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(var, _)) if var == "GOMARKETPLACE_STORAGE_KEY"));
    }

    #[test]
    fn test_empty_data_dir_is_invalid() {
        let result = CartConfig::from_lookup(lookup_from(&[("GOMARKETPLACE_DATA_DIR", "")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_builder_overrides() {
        let config = CartConfig::default()
            .with_data_dir("/tmp/cart")
            .with_storage_key("@Other:key")
            .unwrap();
        assert_eq!(config.file_store().root(), std::path::Path::new("/tmp/cart"));
        assert_eq!(config.storage_key, "@Other:key");
        assert!(CartConfig::default().with_storage_key("").is_err());
    }
}
