//! Checkout commands.
//!
//! `--handoff` takes a JSON cart snapshot (the same array format the cart is
//! stored in) and checks it out instead of the saved cart, replacing it.
//!
//! # Usage
//!
//! ```bash
//! gs-cli checkout summary
//! gs-cli checkout place
//! gs-cli checkout place --handoff cart.json
//! ```

use std::fmt::Write;
use std::path::Path;

use genset_spares_core::CartEntry;
use genset_spares_storefront::checkout::{CheckoutError, PlacedOrder};
use genset_spares_storefront::error::{AppError, Result};
use genset_spares_storefront::order::OrderSummary;
use genset_spares_storefront::state::AppState;

use super::cart::EMPTY_CART;
use super::emit;

/// Show the order summary without placing the order.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the handoff file cannot be read.
pub fn summary(state: &AppState, handoff: Option<&Path>) -> Result<()> {
    let checkout = state.checkout(read_handoff(handoff)?);
    match checkout.summary(&state.config().order_settings()) {
        Ok(summary) => emit(&render_summary(&summary)),
        Err(CheckoutError::EmptyCart) => emit(EMPTY_CART),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Place the order: print the numbered message and the link that sends it.
///
/// # Errors
///
/// - `AppError::BadRequest` if the handoff file cannot be read
/// - `AppError::Checkout` if the order number cannot be saved
pub fn place(state: &AppState, handoff: Option<&Path>) -> Result<()> {
    let mut checkout = state.checkout(read_handoff(handoff)?);
    match checkout.place_order(&state.config().order_settings()) {
        Ok(order) => emit(&render_placed(&order)),
        Err(CheckoutError::EmptyCart) => emit(EMPTY_CART),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn read_handoff(path: Option<&Path>) -> Result<Option<Vec<CartEntry>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::BadRequest(format!("cannot read handoff {}: {e}", path.display()))
    })?;
    let entries = serde_json::from_str(&content).map_err(|e| {
        AppError::BadRequest(format!("invalid handoff {}: {e}", path.display()))
    })?;
    Ok(Some(entries))
}

fn render_summary(summary: &OrderSummary) -> String {
    let mut out = String::new();
    for line in &summary.lines {
        let _ = write!(
            out,
            "{} x {} @ {} = {}",
            line.quantity, line.name, line.unit_price, line.line_total
        );
        if !line.savings.amount.is_zero() {
            let _ = write!(out, " ({}% off, you save {})", line.discount_percent, line.savings);
        }
        out.push('\n');
    }
    out.push('\n');

    if !summary.savings.amount.is_zero() {
        let _ = writeln!(out, "Total Savings: {}", summary.savings);
    }
    let _ = writeln!(out, "Subtotal: {}", summary.subtotal);
    let _ = writeln!(out, "GST ({}): {}", summary.tax_rate, summary.tax);
    let _ = write!(out, "Total: {}", summary.total);
    out
}

fn render_placed(order: &PlacedOrder) -> String {
    format!("{}\n\nSend your order: {}", order.message, order.link)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use genset_spares_core::{Cart, CatalogSlug, CurrencyCode, Product, ProductId};
    use genset_spares_storefront::order::TaxRate;
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i32, price: i64, original: Option<i64>) -> Product {
        Product {
            catalog: CatalogSlug::parse("avr").unwrap(),
            id: ProductId::new(id),
            name: format!("AVR-0{id}"),
            description: String::new(),
            price: Decimal::from(price),
            original_price: original.map(Decimal::from),
            image: String::new(),
            features: Vec::new(),
            specifications: BTreeMap::new(),
        }
    }

    #[test]
    fn test_render_summary() {
        let mut cart = Cart::new();
        cart.add(product(1, 100, Some(125)), 2);

        let summary = OrderSummary::from_cart(&cart, TaxRate::GST, CurrencyCode::INR);
        assert_eq!(
            render_summary(&summary),
            "2 x AVR-01 @ ₹100/- = ₹200/- (20% off, you save ₹50/-)\n\
             \n\
             Total Savings: ₹50/-\n\
             Subtotal: ₹200/-\n\
             GST (18%): ₹36/-\n\
             Total: ₹236/-"
        );
    }

    #[test]
    fn test_render_summary_without_savings() {
        let mut cart = Cart::new();
        cart.add(product(2, 600, None), 1);

        let out = render_summary(&OrderSummary::from_cart(&cart, TaxRate::GST, CurrencyCode::INR));
        assert!(!out.contains("Savings"));
        assert!(out.starts_with("1 x AVR-02 @ ₹600/- = ₹600/-\n"));
    }

    #[test]
    fn test_read_handoff() {
        assert!(read_handoff(None).unwrap().is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        let entries = vec![CartEntry::new(product(1, 100, None), 3)];
        std::fs::write(&path, serde_json::to_string(&entries).unwrap()).unwrap();
        assert_eq!(read_handoff(Some(&path)).unwrap(), Some(entries));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_handoff(Some(&path)), Err(AppError::BadRequest(_))));

        let missing = dir.path().join("missing.json");
        assert!(matches!(read_handoff(Some(&missing)), Err(AppError::BadRequest(_))));
    }
}
