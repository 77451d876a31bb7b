//! Sellable products as listed in a catalog.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::id::{CatalogSlug, ProductId, ProductKey};

/// A product listed in a catalog.
///
/// Field names serialize in camelCase (`originalPrice`) and prices as JSON
/// numbers to match the stored cart layout. A product is embedded by value in every cart entry so the
/// cart stays displayable without its catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog that defines `id`. Empty for entries stored before products
    /// were namespaced.
    #[serde(default)]
    pub catalog: CatalogSlug,
    /// Unique within `catalog` only.
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Pre-discount reference price. Expected to be `>= price` but not enforced.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub original_price: Option<Decimal>,
    /// Opaque asset reference (path or URL).
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specifications: BTreeMap<String, String>,
}

impl Product {
    #[must_use]
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.catalog.clone(), self.id)
    }

    /// The price shown struck through; the current price when there is none.
    #[must_use]
    pub fn reference_price(&self) -> Decimal {
        self.original_price.unwrap_or(self.price)
    }

    /// Per-unit saving against the reference price, never negative.
    #[must_use]
    pub fn unit_savings(&self) -> Decimal {
        (self.reference_price() - self.price).max(Decimal::ZERO)
    }

    /// Whole-number percentage discount, rounded half away from zero.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        let reference = self.reference_price();
        let savings = self.unit_savings();
        if savings.is_zero() || reference <= Decimal::ZERO {
            return 0;
        }
        let percent = (savings / reference * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        percent.to_u32().unwrap_or(0)
    }

    #[must_use]
    pub fn is_discounted(&self) -> bool {
        !self.unit_savings().is_zero()
    }
}
