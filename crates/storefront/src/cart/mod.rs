//! Cart store: the authoritative in-memory cart mirrored to persistent storage.
//!
//! Each view (catalog page, checkout) owns a [`CartStore`] over a shared
//! [`KeyValueStore`]. Every mutation writes the whole cart back under
//! [`keys::CART`], so a store opened later (another page, another process)
//! starts from the latest state.
//!
//! Nothing here fails the caller:
//! - a missing or unparseable stored cart loads as empty
//! - a failed write is logged and the in-memory cart stays authoritative
//! - updates and removals of unknown products are no-ops
//!
//! An empty cart is never written as `[]`; the key is deleted instead, so an
//! emptied cart and a cleared cart are indistinguishable.

mod notice;

use std::str::FromStr;
use std::time::Instant;

use genset_spares_core::{Cart, CartEntry, Product, ProductKey};
use thiserror::Error;

use crate::storage::{KeyValueStore, keys};

pub use notice::{AddedNotice, CartEvent, NOTICE_TTL};
use notice::Listener;

/// What `set_quantity` does with a quantity below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantityPolicy {
    /// Remove the entry (decrementing past one deletes it).
    #[default]
    RemoveBelowOne,
    /// Keep the entry at quantity one; only `remove_item` deletes.
    FloorAtOne,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown quantity policy '{0}' (expected 'remove' or 'floor')")]
pub struct UnknownPolicy(pub String);

impl FromStr for QuantityPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remove" => Ok(Self::RemoveBelowOne),
            "floor" => Ok(Self::FloorAtOne),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

/// Read the persisted cart, treating absence and corruption as empty.
pub fn load_cart<S: KeyValueStore + ?Sized>(store: &S) -> Cart {
    let raw = match store.load(keys::CART) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
            return Cart::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Stored cart is not valid, starting empty");
        Cart::new()
    })
}

/// Owner of the cart for one view.
pub struct CartStore<S> {
    store: S,
    cart: Cart,
    policy: QuantityPolicy,
    listeners: Vec<Listener>,
    notice: Option<AddedNotice>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open a cart store, hydrating from `store`.
    pub fn open(store: S, policy: QuantityPolicy) -> Self {
        let cart = load_cart(&store);
        tracing::debug!(entries = cart.len(), "Cart loaded");
        Self {
            store,
            cart,
            policy,
            listeners: Vec::new(),
            notice: None,
        }
    }

    /// Re-read the persisted cart, discarding in-memory state.
    ///
    /// Use when another view may have written since this store was opened.
    pub fn load(&mut self) -> &Cart {
        self.cart = load_cart(&self.store);
        &self.cart
    }

    /// Replace the cart with a snapshot handed over by the previous view and
    /// persist it immediately. The snapshot wins over whatever is stored.
    pub fn hydrate(&mut self, entries: impl IntoIterator<Item = CartEntry>) {
        self.cart = Cart::from_entries(entries);
        tracing::debug!(entries = self.cart.len(), "Cart hydrated from handoff");
        self.persist();
    }

    /// Add `quantity` units of `product`, merging with an existing entry.
    ///
    /// Returns the entry's resulting quantity; adding zero changes nothing.
    pub fn add_item(&mut self, product: Product, quantity: u32) -> Option<u32> {
        let key = product.key();
        let name = product.name.clone();
        let total = self.cart.add(product, quantity)?;
        tracing::debug!(product = %key, added = quantity, quantity = total, "Item added to cart");
        self.persist();

        self.notice = Some(AddedNotice::new(name.clone(), quantity));
        self.emit(&CartEvent::ItemAdded {
            key,
            name,
            added: quantity,
            quantity: total,
        });
        Some(total)
    }

    /// Set the quantity of an existing entry, applying the configured
    /// [`QuantityPolicy`] to quantities below one. Unknown keys are ignored.
    pub fn set_quantity(&mut self, key: &ProductKey, quantity: u32) {
        if !self.cart.contains(key) {
            tracing::debug!(product = %key, "Ignoring quantity update for product not in cart");
            return;
        }
        let quantity = match self.policy {
            QuantityPolicy::RemoveBelowOne => quantity,
            QuantityPolicy::FloorAtOne => quantity.max(1),
        };
        self.cart.set_quantity(key, quantity);
        tracing::debug!(product = %key, quantity, "Cart quantity updated");
        self.persist();
    }

    /// Raise an entry's quantity by one.
    pub fn increment(&mut self, key: &ProductKey) {
        if let Some(current) = self.quantity_of(key) {
            self.set_quantity(key, current.saturating_add(1));
        }
    }

    /// Lower an entry's quantity by one, subject to the quantity policy.
    pub fn decrement(&mut self, key: &ProductKey) {
        if let Some(current) = self.quantity_of(key) {
            self.set_quantity(key, current.saturating_sub(1));
        }
    }

    /// Delete an entry. Unknown keys are ignored.
    pub fn remove_item(&mut self, key: &ProductKey) {
        if self.cart.remove(key).is_some() {
            tracing::debug!(product = %key, "Item removed from cart");
            self.persist();
        }
    }

    /// Empty the cart and delete the persisted key.
    pub fn clear(&mut self) {
        self.cart.clear();
        if let Err(e) = self.store.delete(keys::CART) {
            tracing::warn!(error = %e, "Failed to delete stored cart");
        }
        tracing::debug!("Cart cleared");
        self.emit(&CartEvent::Cleared);
    }

    /// Total units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn policy(&self) -> QuantityPolicy {
        self.policy
    }

    /// The backing store, e.g. for the order counter.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Register a callback for cart events.
    pub fn subscribe(&mut self, listener: impl Fn(&CartEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// The last "added" notice, if it is still visible at `now`.
    #[must_use]
    pub fn notice_at(&self, now: Instant) -> Option<&AddedNotice> {
        self.notice.as_ref().filter(|n| n.is_visible_at(now))
    }

    fn quantity_of(&self, key: &ProductKey) -> Option<u32> {
        self.cart.get(key).map(|e| e.quantity)
    }

    fn emit(&self, event: &CartEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    fn persist(&self) {
        let result = if self.cart.is_empty() {
            self.store.delete(keys::CART)
        } else {
            match serde_json::to_string(&self.cart) {
                Ok(json) => self.store.save(keys::CART, &json),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to serialize cart");
                    return;
                }
            }
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("policy", &self.policy)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use genset_spares_core::{CatalogSlug, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStore;

    fn product(id: i32) -> Product {
        Product {
            catalog: CatalogSlug::parse("avr").unwrap(),
            id: ProductId::new(id),
            name: format!("AVR-{id:02}"),
            description: String::new(),
            price: Decimal::from(100),
            original_price: Some(Decimal::from(125)),
            image: String::new(),
            features: Vec::new(),
            specifications: BTreeMap::new(),
        }
    }

    fn open(policy: QuantityPolicy) -> CartStore<Arc<MemoryStore>> {
        CartStore::open(Arc::new(MemoryStore::new()), policy)
    }

    #[test]
    fn test_add_sums_quantities_per_product() {
        let mut carts = open(QuantityPolicy::default());
        carts.add_item(product(1), 1);
        carts.add_item(product(2), 2);
        assert_eq!(carts.add_item(product(1), 3), Some(4));

        assert_eq!(carts.cart().len(), 2);
        assert_eq!(carts.cart().get(&product(1).key()).unwrap().quantity, 4);
        assert_eq!(carts.item_count(), 6);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut carts = open(QuantityPolicy::default());
        let store = Arc::clone(carts.store());

        carts.add_item(product(1), 2);
        assert_eq!(load_cart(&store).quantities(), carts.cart().quantities());

        carts.set_quantity(&product(1).key(), 5);
        assert_eq!(load_cart(&store).quantities(), carts.cart().quantities());

        carts.add_item(product(2), 1);
        carts.remove_item(&product(1).key());
        assert_eq!(load_cart(&store).quantities(), carts.cart().quantities());
    }

    #[test]
    fn test_set_quantity_below_one_removes() {
        let mut carts = open(QuantityPolicy::RemoveBelowOne);
        carts.add_item(product(1), 2);

        carts.set_quantity(&product(1).key(), 0);

        assert!(carts.cart().is_empty());
        assert!(!carts.store().contains(keys::CART));
    }

    #[test]
    fn test_floor_policy_keeps_entry_at_one() {
        let mut carts = open(QuantityPolicy::FloorAtOne);
        carts.add_item(product(1), 2);

        carts.set_quantity(&product(1).key(), 0);
        assert_eq!(carts.cart().get(&product(1).key()).unwrap().quantity, 1);

        carts.decrement(&product(1).key());
        assert_eq!(carts.item_count(), 1);
    }

    #[test]
    fn test_decrement_past_one_removes_by_default() {
        let mut carts = open(QuantityPolicy::default());
        carts.add_item(product(1), 1);
        carts.increment(&product(1).key());
        assert_eq!(carts.item_count(), 2);

        carts.decrement(&product(1).key());
        carts.decrement(&product(1).key());
        assert!(carts.cart().is_empty());
    }

    #[test]
    fn test_unknown_product_updates_are_noops() {
        let mut carts = open(QuantityPolicy::default());
        carts.add_item(product(1), 1);
        carts.add_item(product(2), 1);
        let before = carts.cart().clone();

        carts.remove_item(&product(3).key());
        carts.set_quantity(&product(3).key(), 7);
        carts.increment(&product(3).key());

        assert_eq!(carts.cart(), &before);
    }

    #[test]
    fn test_clear_deletes_key_and_matches_empty_cart() {
        let mut cleared = open(QuantityPolicy::default());
        cleared.add_item(product(1), 3);
        cleared.clear();

        let never_used = open(QuantityPolicy::default());

        assert_eq!(cleared.item_count(), 0);
        assert_eq!(cleared.cart(), never_used.cart());
        assert!(!cleared.store().contains(keys::CART));
        assert!(!never_used.store().contains(keys::CART));
    }

    #[test]
    fn test_corrupt_blob_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.save(keys::CART, "definitely not json").unwrap();

        let carts = CartStore::open(Arc::clone(&store), QuantityPolicy::default());
        assert!(carts.cart().is_empty());
        assert_eq!(carts.item_count(), 0);
    }

    #[test]
    fn test_hydrate_overwrites_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut stale = CartStore::open(Arc::clone(&store), QuantityPolicy::default());
        stale.add_item(product(9), 9);

        let mut checkout = CartStore::open(Arc::clone(&store), QuantityPolicy::default());
        checkout.hydrate(vec![
            CartEntry::new(product(1), 2),
            CartEntry::new(product(1), 1),
        ]);

        assert_eq!(checkout.cart().len(), 1);
        assert_eq!(checkout.item_count(), 3);
        assert_eq!(load_cart(&store).quantities(), checkout.cart().quantities());
    }

    #[test]
    fn test_load_picks_up_other_views() {
        let store = Arc::new(MemoryStore::new());
        let mut catalog_page = CartStore::open(Arc::clone(&store), QuantityPolicy::default());
        let mut checkout = CartStore::open(Arc::clone(&store), QuantityPolicy::default());

        catalog_page.add_item(product(1), 2);
        assert!(checkout.cart().is_empty());

        assert_eq!(checkout.load().item_count(), 2);
    }

    #[test]
    fn test_add_emits_event_and_notice() {
        let mut carts = open(QuantityPolicy::default());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        carts.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        carts.add_item(product(1), 2);
        carts.clear();

        let events = events.lock().unwrap();
        assert_eq!(
            events.first(),
            Some(&CartEvent::ItemAdded {
                key: product(1).key(),
                name: "AVR-01".to_string(),
                added: 2,
                quantity: 2,
            })
        );
        assert_eq!(events.get(1), Some(&CartEvent::Cleared));

        let notice = carts.notice_at(Instant::now()).unwrap();
        assert_eq!(notice.product_name, "AVR-01");
        assert!(carts.notice_at(notice.shown_at + Duration::from_secs(3)).is_none());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("remove".parse::<QuantityPolicy>(), Ok(QuantityPolicy::RemoveBelowOne));
        assert_eq!("Floor".parse::<QuantityPolicy>(), Ok(QuantityPolicy::FloorAtOne));
        assert!("clamp".parse::<QuantityPolicy>().is_err());
    }
}
