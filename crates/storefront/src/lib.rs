//! Genset Spares storefront library.
//!
//! Catalog browsing, a persistent cart shared by every page, order
//! summaries and checkout through a prefilled chat link. The CLI drives
//! these views; tests exercise them directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod contact;
pub mod error;
pub mod order;
pub mod state;
pub mod storage;
