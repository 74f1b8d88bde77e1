//! Go Marketplace Core - Shared cart types library.
//!
//! This crate provides the domain types used across all Go Marketplace components:
//! - `cart` - Persisted cart store and storage backends
//! - `cli` - Command-line tools for inspecting and editing a cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure in-memory operations - no I/O,
//! no storage access, no async runtime. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices, plus cart items and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
