//! Checkout: turn the cart into a numbered order message and a contact link.
//!
//! Checkout accepts the cart from two sources. A snapshot handed over by the
//! page that started checkout wins; otherwise the persisted cart is used.
//! Placing an order clears the cart but never resets the order counter.

use chrono::{DateTime, Utc};
use genset_spares_core::{CartEntry, CurrencyCode};
use thiserror::Error;
use url::Url;

use crate::cart::{CartStore, QuantityPolicy};
use crate::contact::{ContactError, PhoneNumber, whatsapp_link};
use crate::order::{OrderSequence, OrderSummary, TaxRate};
use crate::storage::{KeyValueStore, StorageError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order; the view should offer to continue shopping.
    #[error("cart is empty")]
    EmptyCart,

    #[error("failed to issue order number: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Contact(#[from] ContactError),
}

/// Pricing and contact details applied at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSettings {
    pub tax_rate: TaxRate,
    pub currency: CurrencyCode,
    pub contact_phone: PhoneNumber,
}

/// The outcome of a successful checkout.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub sequence: u64,
    pub summary: OrderSummary,
    pub message: String,
    pub link: Url,
    pub placed_at: DateTime<Utc>,
}

/// The checkout view's cart.
#[derive(Debug)]
pub struct Checkout<S> {
    carts: CartStore<S>,
}

impl<S: KeyValueStore> Checkout<S> {
    /// Open checkout over `store`, preferring `handoff` when the previous view
    /// passed its cart along. A handoff is persisted immediately.
    pub fn open(store: S, policy: QuantityPolicy, handoff: Option<Vec<CartEntry>>) -> Self {
        let mut carts = CartStore::open(store, policy);
        if let Some(snapshot) = handoff {
            carts.hydrate(snapshot);
        }
        Self { carts }
    }

    #[must_use]
    pub const fn carts(&self) -> &CartStore<S> {
        &self.carts
    }

    /// Mutable access for quantity changes made on the checkout page.
    pub fn carts_mut(&mut self) -> &mut CartStore<S> {
        &mut self.carts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carts.cart().is_empty()
    }

    /// Summarize the cart without issuing an order number.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there is nothing to summarize.
    pub fn summary(&self, settings: &OrderSettings) -> Result<OrderSummary, CheckoutError> {
        if self.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(OrderSummary::from_cart(
            self.carts.cart(),
            settings.tax_rate,
            settings.currency,
        ))
    }

    /// Number the order, format its message, build the contact link and
    /// clear the cart.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::EmptyCart` if the cart is empty; nothing changes
    /// - `CheckoutError::Storage` if the order number cannot be read or
    ///   persisted; the cart is kept
    /// - `CheckoutError::Contact` if the link cannot be built
    pub fn place_order(&mut self, settings: &OrderSettings) -> Result<PlacedOrder, CheckoutError> {
        let summary = self.summary(settings)?;
        let sequence = OrderSequence::new(self.carts.store()).next()?;
        let message = summary.to_message(sequence);
        let link = whatsapp_link(&settings.contact_phone, &message)?;

        tracing::info!(
            sequence,
            lines = summary.lines.len(),
            items = self.carts.item_count(),
            total = %summary.total,
            "Order placed"
        );
        self.carts.clear();

        Ok(PlacedOrder {
            sequence,
            summary,
            message,
            link,
            placed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use genset_spares_core::{CatalogSlug, Product, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::load_cart;
    use crate::storage::{MemoryStore, keys};

    fn product(id: i32, price: i64) -> Product {
        Product {
            catalog: CatalogSlug::parse("rectifier").unwrap(),
            id: ProductId::new(id),
            name: format!("Rectifier R{id}"),
            description: String::new(),
            price: Decimal::from(price),
            original_price: Some(Decimal::from(price + 25)),
            image: String::new(),
            features: Vec::new(),
            specifications: BTreeMap::new(),
        }
    }

    fn settings() -> OrderSettings {
        OrderSettings {
            tax_rate: TaxRate::GST,
            currency: CurrencyCode::INR,
            contact_phone: PhoneNumber::parse("919911231643").unwrap(),
        }
    }

    #[test]
    fn test_handoff_wins_over_storage() {
        let store = Arc::new(MemoryStore::new());
        let mut page = CartStore::open(Arc::clone(&store), QuantityPolicy::default());
        page.add_item(product(1, 100), 5);

        let handoff = vec![CartEntry::new(product(2, 100), 1)];
        let checkout = Checkout::open(Arc::clone(&store), QuantityPolicy::default(), Some(handoff));

        assert_eq!(checkout.carts().item_count(), 1);
        assert_eq!(load_cart(&store).quantities(), checkout.carts().cart().quantities());
    }

    #[test]
    fn test_storage_used_without_handoff() {
        let store = Arc::new(MemoryStore::new());
        let mut page = CartStore::open(Arc::clone(&store), QuantityPolicy::default());
        page.add_item(product(1, 100), 2);

        let checkout = Checkout::open(Arc::clone(&store), QuantityPolicy::default(), None);
        assert_eq!(checkout.carts().item_count(), 2);
    }

    #[test]
    fn test_empty_cart_cannot_check_out() {
        let store = Arc::new(MemoryStore::new());
        let mut checkout = Checkout::open(Arc::clone(&store), QuantityPolicy::default(), None);

        assert!(matches!(checkout.summary(&settings()), Err(CheckoutError::EmptyCart)));
        assert!(matches!(
            checkout.place_order(&settings()),
            Err(CheckoutError::EmptyCart)
        ));
        // no order number was consumed
        assert!(store.load(keys::ORDER_SEQUENCE).unwrap().is_none());
    }

    #[test]
    fn test_place_order_numbers_and_clears() {
        let store = Arc::new(MemoryStore::new());
        let mut checkout = Checkout::open(Arc::clone(&store), QuantityPolicy::default(), None);
        checkout.carts_mut().add_item(product(1, 100), 2);

        let order = checkout.place_order(&settings()).unwrap();

        assert_eq!(order.sequence, 1);
        assert!(order.message.starts_with("Order #1\n"));
        assert_eq!(order.summary.total.to_string(), "₹236/-");
        assert_eq!(order.link.path(), "/919911231643");
        assert!(checkout.is_empty());
        assert!(!store.contains(keys::CART));
    }

    #[test]
    fn test_sequence_continues_across_orders() {
        let store = Arc::new(MemoryStore::new());
        let mut checkout = Checkout::open(Arc::clone(&store), QuantityPolicy::default(), None);

        let mut issued = Vec::new();
        for quantity in 1..=3 {
            checkout.carts_mut().add_item(product(1, 100), quantity);
            issued.push(checkout.place_order(&settings()).unwrap().sequence);
        }

        assert_eq!(issued, vec![1, 2, 3]);
    }
}
