//! Integration tests for Go Marketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart store over the file backend: reloads, corrupt
//!   records, and write ordering
//!
//! Shared fixtures live here so every test file builds products the same way.

use go_marketplace_cart::{CartConfig, CartStore, FileStore};
use go_marketplace_core::{NewCartItem, Price, ProductId};
use tempfile::TempDir;

/// A catalog product priced in cents.
#[must_use]
pub fn product(id: &str, title: &str, cents: i64) -> NewCartItem {
    NewCartItem {
        id: ProductId::new(id),
        title: title.to_string(),
        image_url: format!("https://cdn.example.com/{id}.png"),
        price: Price::from_cents(cents),
    }
}

/// Configuration pointing at a fresh temporary data directory.
///
/// Keep the returned `TempDir` alive for as long as the config is used.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
#[allow(clippy::expect_used)]
pub fn temp_config() -> (TempDir, CartConfig) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = CartConfig::default().with_data_dir(dir.path());
    (dir, config)
}

/// Load the cart described by `config`.
pub async fn open(config: &CartConfig) -> CartStore<FileStore> {
    CartStore::load(config.file_store(), &config.storage_key).await
}
