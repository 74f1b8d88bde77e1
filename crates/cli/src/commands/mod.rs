//! Command implementations.

pub mod cart;
