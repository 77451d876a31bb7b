//! Genset Spares Core - Shared types library.
//!
//! This crate provides common types used across all Genset Spares components:
//! - `storefront` - Cart store, order summaries, catalogs and checkout
//! - `cli` - Command-line storefront for browsing catalogs and placing orders
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations on them - no I/O,
//! no storage access, no logging. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids and prices, plus products and carts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
