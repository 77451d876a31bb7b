//! Cart commands.
//!
//! Each invocation opens its own cart store over the shared data directory,
//! the same way every page of the shop hydrates from persisted state.
//!
//! # Usage
//!
//! ```bash
//! gs-cli cart add avr/1 -q 2
//! gs-cli cart inc avr/1
//! gs-cli cart set avr/1 5
//! gs-cli cart remove avr/1
//! gs-cli cart show
//! ```

use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;

use genset_spares_core::{Cart, CurrencyCode, Price, ProductKey};
use genset_spares_storefront::cart::{CartEvent, CartStore};
use genset_spares_storefront::error::{AppError, Result};
use genset_spares_storefront::order;
use genset_spares_storefront::state::AppState;
use genset_spares_storefront::storage::{JsonFileStore, KeyValueStore};
use rust_decimal::Decimal;

use super::emit;

pub(crate) const EMPTY_CART: &str = "Your cart is empty.\nBrowse products with: gs-cli catalog list";

/// Show cart contents.
pub fn show(state: &AppState) {
    let carts = state.cart_store();
    emit(&render_cart(carts.cart(), state.config().currency));
}

/// Print the total number of units, as shown on the header badge.
pub fn count(state: &AppState) {
    emit(&state.cart_store().item_count().to_string());
}

/// Add `quantity` units of a catalog product.
///
/// # Errors
///
/// - `AppError::BadRequest` if `quantity` is zero
/// - `AppError::NotFound` if the product is not in any catalog
pub fn add(state: &AppState, key: &ProductKey, quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }
    let product = state
        .catalogs()
        .product(key)
        .ok_or_else(|| AppError::NotFound(format!("product '{key}'")))?
        .clone();

    let mut carts = open(state);
    carts.add_item(product, quantity);

    if let Some(notice) = carts.notice_at(Instant::now()) {
        emit(&format!(
            "Added {} x {} to cart ({} items)",
            notice.added,
            notice.product_name,
            carts.item_count()
        ));
    }
    Ok(())
}

/// Set the quantity of an entry already in the cart.
///
/// A product that is not in the cart is left out; the command reports it
/// and succeeds.
pub fn set(state: &AppState, key: &ProductKey, quantity: u32) {
    emit(&update_entry(&mut open(state), key, |carts| {
        carts.set_quantity(key, quantity);
    }));
}

/// Raise an entry's quantity by one.
pub fn increment(state: &AppState, key: &ProductKey) {
    emit(&update_entry(&mut open(state), key, |carts| carts.increment(key)));
}

/// Lower an entry's quantity by one.
pub fn decrement(state: &AppState, key: &ProductKey) {
    emit(&update_entry(&mut open(state), key, |carts| carts.decrement(key)));
}

/// Remove an entry.
pub fn remove(state: &AppState, key: &ProductKey) {
    emit(&update_entry(&mut open(state), key, |carts| carts.remove_item(key)));
}

/// Empty the cart.
pub fn clear(state: &AppState) {
    open(state).clear();
    emit("Cart cleared.");
}

type FileCartStore = CartStore<Arc<JsonFileStore>>;

/// Open the cart with a listener that logs changes.
fn open(state: &AppState) -> FileCartStore {
    let mut carts = state.cart_store();
    carts.subscribe(|event| match event {
        CartEvent::ItemAdded { key, quantity, .. } => {
            tracing::info!(product = %key, quantity, "Cart updated");
        }
        CartEvent::Cleared => tracing::info!("Cart cleared"),
    });
    carts
}

/// Apply `change` to an entry and describe the result. Unknown entries are
/// not touched.
fn update_entry<S: KeyValueStore>(
    carts: &mut CartStore<S>,
    key: &ProductKey,
    change: impl FnOnce(&mut CartStore<S>),
) -> String {
    if !carts.cart().contains(key) {
        tracing::debug!(product = %key, "Entry not in cart, nothing to update");
        return format!("{key} is not in the cart.");
    }
    change(carts);
    render_entry_status(carts.cart(), key)
}

fn render_entry_status(cart: &Cart, key: &ProductKey) -> String {
    match cart.get(key) {
        Some(entry) => format!("{} x {}", entry.quantity, entry.product.name),
        None => format!("Removed {key} from cart."),
    }
}

pub(crate) fn render_cart(cart: &Cart, currency: CurrencyCode) -> String {
    if cart.is_empty() {
        return EMPTY_CART.to_string();
    }

    let mut out = String::new();
    for entry in cart {
        let product = &entry.product;
        let _ = writeln!(
            out,
            "[{}] {} x {} @ {} = {}",
            product.key(),
            entry.quantity,
            product.name,
            Price::new(product.price, currency),
            Price::new(product.price * Decimal::from(entry.quantity), currency)
        );
    }
    let _ = write!(
        out,
        "\n{} items, subtotal {}",
        cart.item_count(),
        Price::new(order::subtotal(cart), currency)
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use genset_spares_core::{CatalogSlug, Product, ProductId};
    use genset_spares_storefront::cart::QuantityPolicy;
    use genset_spares_storefront::storage::MemoryStore;

    use super::*;

    fn product(catalog: &str, id: i32, name: &str, price: i64) -> Product {
        Product {
            catalog: CatalogSlug::parse(catalog).unwrap(),
            id: ProductId::new(id),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::from(price),
            original_price: None,
            image: String::new(),
            features: Vec::new(),
            specifications: BTreeMap::new(),
        }
    }

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render_cart(&Cart::new(), CurrencyCode::INR), EMPTY_CART);
    }

    #[test]
    fn test_render_cart() {
        let mut cart = Cart::new();
        cart.add(product("avr", 1, "AVR (UEI-01)", 550), 2);
        cart.add(product("llop", 401, "LLOP Model A", 980), 1);

        let out = render_cart(&cart, CurrencyCode::INR);
        assert_eq!(
            out,
            "[avr/1] 2 x AVR (UEI-01) @ ₹550/- = ₹1100/-\n\
             [llop/401] 1 x LLOP Model A @ ₹980/- = ₹980/-\n\
             \n3 items, subtotal ₹2080/-"
        );
    }

    #[test]
    fn test_render_entry_status() {
        let mut cart = Cart::new();
        let item = product("avr", 1, "AVR (UEI-01)", 550);
        let key = item.key();
        cart.add(item, 3);

        assert_eq!(render_entry_status(&cart, &key), "3 x AVR (UEI-01)");
        cart.remove(&key);
        assert_eq!(render_entry_status(&cart, &key), "Removed avr/1 from cart.");
    }

    #[test]
    fn test_update_missing_entry_is_a_no_op() {
        let mut carts = CartStore::open(MemoryStore::new(), QuantityPolicy::RemoveBelowOne);
        carts.add_item(product("avr", 1, "AVR (UEI-01)", 550), 2);
        let missing: ProductKey = "avr/3".parse().unwrap();

        let out = update_entry(&mut carts, &missing, |c| c.set_quantity(&missing, 5));
        assert_eq!(out, "avr/3 is not in the cart.");
        let out = update_entry(&mut carts, &missing, |c| c.remove_item(&missing));
        assert_eq!(out, "avr/3 is not in the cart.");

        assert_eq!(carts.item_count(), 2);
        assert!(!carts.cart().contains(&missing));
    }

    #[test]
    fn test_update_existing_entry() {
        let mut carts = CartStore::open(MemoryStore::new(), QuantityPolicy::RemoveBelowOne);
        let item = product("avr", 1, "AVR (UEI-01)", 550);
        let key = item.key();
        carts.add_item(item, 1);

        assert_eq!(update_entry(&mut carts, &key, |c| c.increment(&key)), "2 x AVR (UEI-01)");
        assert_eq!(
            update_entry(&mut carts, &key, |c| c.remove_item(&key)),
            "Removed avr/1 from cart."
        );
    }
}
