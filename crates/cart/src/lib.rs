//! Go Marketplace Cart - Persisted shopping cart store.
//!
//! Holds the shopper's cart in memory, exposes add/increment/decrement to
//! consumers, and mirrors the whole cart into a single key-value record after
//! every change so it survives restarts.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the cart and is passed explicitly to consumers
//!   (clone it to share); there is no global registry
//! - Mutations are synchronous in memory; persistence runs as a tokio task
//!   whose outcome is available through a [`PersistHandle`]
//! - Storage is abstracted behind [`KeyValueStore`], with file-backed and
//!   in-memory implementations
//!
//! # Example
//!
//! ```rust,no_run
//! use go_marketplace_cart::{CartConfig, CartStore};
//! use go_marketplace_core::{NewCartItem, Price, ProductId};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CartConfig::from_env()?;
//! let store = CartStore::load(config.file_store(), &config.storage_key).await;
//!
//! store
//!     .add_to_cart(NewCartItem {
//!         id: ProductId::new("1"),
//!         title: "Coffee mug".to_string(),
//!         image_url: "https://cdn.example.com/mug.png".to_string(),
//!         price: Price::from_cents(1990),
//!     })
//!     .wait()
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, DEFAULT_STORAGE_KEY};
pub use error::{CartError, Result};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartStore, PersistHandle, PersistOutcome};
