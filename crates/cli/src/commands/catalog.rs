//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! gs-cli catalog list
//! gs-cli catalog show llop
//! gs-cli catalog product llop/401
//! ```

use std::fmt::Write;

use genset_spares_core::{CurrencyCode, Price, Product, ProductKey};
use genset_spares_storefront::catalog::{Catalog, CatalogRegistry};
use genset_spares_storefront::contact::PhoneNumber;
use genset_spares_storefront::error::{AppError, Result};
use genset_spares_storefront::state::AppState;

use super::emit;

/// List every loaded catalog.
pub fn list(state: &AppState) {
    emit(&render_list(state.catalogs()));
}

/// Show one catalog page.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no catalog has this slug.
pub fn show(state: &AppState, slug: &str) -> Result<()> {
    let catalog = state
        .catalogs()
        .find(slug)
        .ok_or_else(|| AppError::NotFound(format!("catalog '{slug}'")))?;
    let config = state.config();
    emit(&render_catalog(catalog, config.currency, &config.contact_phone));
    Ok(())
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product is not in any catalog.
pub fn product(state: &AppState, key: &ProductKey) -> Result<()> {
    let product = state
        .catalogs()
        .product(key)
        .ok_or_else(|| AppError::NotFound(format!("product '{key}'")))?;
    emit(&render_product(product, state.config().currency));
    Ok(())
}

fn render_list(catalogs: &CatalogRegistry) -> String {
    if catalogs.is_empty() {
        return "No catalogs found.".to_string();
    }

    let mut out = String::new();
    for catalog in catalogs.iter() {
        let _ = writeln!(
            out,
            "{:<16} {} ({} products)",
            catalog.slug.as_str(),
            catalog.title,
            catalog.products.len()
        );
    }
    out
}

fn render_catalog(catalog: &Catalog, currency: CurrencyCode, phone: &PhoneNumber) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", catalog.title);
    if let Some(tagline) = &catalog.tagline {
        let _ = writeln!(out, "{tagline}");
    }
    if catalog.display.show_contact_header {
        let _ = writeln!(out, "Call or WhatsApp: +{phone}");
    }
    out.push('\n');

    for product in &catalog.products {
        let _ = write!(
            out,
            "[{}] {} - {}",
            product.key(),
            product.name,
            Price::new(product.price, currency)
        );
        if product.is_discounted() {
            let _ = write!(out, " (was {}", Price::new(product.reference_price(), currency));
            if catalog.display.show_discount_badge {
                let _ = write!(out, ", {}% off", product.discount_percent());
            }
            out.push(')');
        }
        out.push('\n');
    }

    if let Some(first) = catalog.products.first() {
        let quantity = if catalog.display.quantity_selector {
            " -q <quantity>"
        } else {
            ""
        };
        let _ = write!(out, "\nAdd to cart: gs-cli cart add {}{quantity}", first.key());
    }
    out
}

fn render_product(product: &Product, currency: CurrencyCode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", product.name, product.key());
    if !product.description.is_empty() {
        let _ = writeln!(out, "{}", product.description);
    }
    let _ = write!(out, "Price: {}", Price::new(product.price, currency));
    if product.is_discounted() {
        let _ = write!(
            out,
            " (was {}, {}% off)",
            Price::new(product.reference_price(), currency),
            product.discount_percent()
        );
    }
    out.push('\n');

    if !product.features.is_empty() {
        let _ = writeln!(out, "\nFeatures:");
        for feature in &product.features {
            let _ = writeln!(out, "  - {feature}");
        }
    }
    if !product.specifications.is_empty() {
        let _ = writeln!(out, "\nSpecifications:");
        for (name, value) in &product.specifications {
            let _ = writeln!(out, "  {name}: {value}");
        }
    }
    if !product.image.is_empty() {
        let _ = writeln!(out, "\nImage: {}", product.image);
    }
    out
}
