//! Order summary calculation over a cart snapshot.
//!
//! All functions are pure. Money is `Decimal` throughout; only the tax amount
//! is rounded (half up, to whole currency units), never the subtotal.

mod message;
mod sequence;

use std::fmt;
use std::str::FromStr;

use genset_spares_core::{Cart, CartEntry, CurrencyCode, Price};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

pub use message::{CONTACT_REQUEST, FREIGHT_NOTE, format_order_message};
pub use sequence::OrderSequence;

/// Flat tax rate as a fraction (`0.18` for 18%).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRate(Decimal);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxRateError {
    #[error("tax rate is not a number: {0}")]
    NotANumber(String),
    #[error("tax rate must be between 0 and 1, got {0}")]
    OutOfRange(Decimal),
}

impl TaxRate {
    /// Goods and Services Tax at 18%.
    pub const GST: Self = Self(Decimal::from_parts(18, 0, 0, false, 2));

    /// # Errors
    ///
    /// Returns `TaxRateError::OutOfRange` unless `0 <= rate <= 1`.
    pub fn new(rate: Decimal) -> Result<Self, TaxRateError> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(TaxRateError::OutOfRange(rate));
        }
        Ok(Self(rate))
    }

    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// The rate as a percentage, e.g. `18` or `12.5`.
    #[must_use]
    pub fn percent(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::GST
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl FromStr for TaxRate {
    type Err = TaxRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate = Decimal::from_str(s.trim()).map_err(|_| TaxRateError::NotANumber(s.to_string()))?;
        Self::new(rate)
    }
}

fn line_total(entry: &CartEntry) -> Decimal {
    entry.product.price * Decimal::from(entry.quantity)
}

fn line_savings(entry: &CartEntry) -> Decimal {
    entry.product.unit_savings() * Decimal::from(entry.quantity)
}

/// Sum of `price * quantity` over all entries.
#[must_use]
pub fn subtotal(cart: &Cart) -> Decimal {
    cart.entries().iter().map(line_total).sum()
}

/// Sum of `max(0, originalPrice - price) * quantity` over all entries.
#[must_use]
pub fn savings(cart: &Cart) -> Decimal {
    cart.entries().iter().map(line_savings).sum()
}

/// Tax on the subtotal, rounded half up to a whole currency unit.
#[must_use]
pub fn tax(cart: &Cart, rate: TaxRate) -> Decimal {
    (subtotal(cart) * rate.as_decimal())
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Subtotal plus tax.
#[must_use]
pub fn total(cart: &Cart, rate: TaxRate) -> Decimal {
    subtotal(cart) + tax(cart, rate)
}

/// Per-entry figures for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSummary {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
    /// Zero when the product is not discounted.
    pub savings: Price,
    pub discount_percent: u32,
}

/// Everything the checkout view and the order message show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub lines: Vec<LineSummary>,
    pub savings: Price,
    pub subtotal: Price,
    pub tax_rate: TaxRate,
    pub tax: Price,
    pub total: Price,
}

impl OrderSummary {
    #[must_use]
    pub fn from_cart(cart: &Cart, tax_rate: TaxRate, currency: CurrencyCode) -> Self {
        let price = |amount| Price::new(amount, currency);
        let lines = cart
            .entries()
            .iter()
            .map(|entry| LineSummary {
                name: entry.product.name.clone(),
                quantity: entry.quantity,
                unit_price: price(entry.product.price),
                line_total: price(line_total(entry)),
                savings: price(line_savings(entry)),
                discount_percent: entry.product.discount_percent(),
            })
            .collect();

        Self {
            lines,
            savings: price(savings(cart)),
            subtotal: price(subtotal(cart)),
            tax_rate,
            tax: price(tax(cart, tax_rate)),
            total: price(total(cart, tax_rate)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
