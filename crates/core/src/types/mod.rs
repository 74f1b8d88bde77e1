//! Core types for Go Marketplace.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;

pub use cart::{Cart, CartItem, NewCartItem};
pub use id::*;
pub use price::{Price, PriceError};
