//! Cart contents: an ordered list of product/quantity pairs.
//!
//! [`Cart`] upholds two invariants on every construction path, including
//! deserialization:
//! - at most one entry per [`ProductKey`]
//! - every entry has a quantity of at least 1
//!
//! Insertion order is kept for display only.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::id::ProductKey;
use super::product::Product;

/// A product and how many of it are in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    #[must_use]
    pub fn key(&self) -> ProductKey {
        self.product.key()
    }
}

/// The user's current selection.
///
/// Serializes as a plain array of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from raw entries, merging duplicate keys (quantities are
    /// summed, first position wins) and dropping zero-quantity entries.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = CartEntry>) -> Self {
        let mut cart = Self::new();
        for entry in entries {
            cart.add(entry.product, entry.quantity);
        }
        cart
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum of quantities across all entries (the badge counter).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    #[must_use]
    pub fn get(&self, key: &ProductKey) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product.key() == *key)
    }

    #[must_use]
    pub fn contains(&self, key: &ProductKey) -> bool {
        self.get(key).is_some()
    }

    /// Add `quantity` of `product`, merging into an existing entry.
    ///
    /// Returns the entry's resulting quantity, or `None` when `quantity` is
    /// zero and the cart is left untouched.
    pub fn add(&mut self, product: Product, quantity: u32) -> Option<u32> {
        if quantity == 0 {
            return None;
        }
        let key = product.key();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.product.key() == key) {
            entry.quantity = entry.quantity.saturating_add(quantity);
            return Some(entry.quantity);
        }
        self.entries.push(CartEntry::new(product, quantity));
        Some(quantity)
    }

    /// Replace the quantity of an existing entry. A zero quantity removes
    /// the entry. Returns `false` if no entry has `key`.
    pub fn set_quantity(&mut self, key: &ProductKey, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(key).is_some();
        }
        match self.entries.iter_mut().find(|e| e.product.key() == *key) {
            Some(entry) => {
                entry.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with `key`, if present.
    pub fn remove(&mut self, key: &ProductKey) -> Option<CartEntry> {
        let index = self.entries.iter().position(|e| e.product.key() == *key)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Quantities by key, for comparing carts regardless of entry order or
    /// embedded product details.
    #[must_use]
    pub fn quantities(&self) -> HashMap<ProductKey, u32> {
        self.entries
            .iter()
            .map(|e| (e.product.key(), e.quantity))
            .collect()
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
