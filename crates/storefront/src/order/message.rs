//! Plain-text order message sent through the contact link.

use std::fmt;

use genset_spares_core::{Cart, CurrencyCode};

use super::{OrderSummary, TaxRate};

const GREETING: &str = "Hello! I'm interested in placing an order for:";

/// Disclaimer printed under the tax line.
pub const FREIGHT_NOTE: &str = "*Freight charges extra";

/// Closing line of every order message.
pub const CONTACT_REQUEST: &str = "Please contact me to proceed.";

/// Format the order message for `cart` in the default currency.
#[must_use]
pub fn format_order_message(cart: &Cart, rate: TaxRate, sequence: u64) -> String {
    OrderSummary::from_cart(cart, rate, CurrencyCode::default()).to_message(sequence)
}

impl OrderSummary {
    /// Render the summary as a multi-line message stamped with `sequence`.
    ///
    /// Savings appear per line and in aggregate only when non-zero.
    #[must_use]
    pub fn to_message(&self, sequence: u64) -> String {
        OrderMessage {
            summary: self,
            sequence,
        }
        .to_string()
    }
}

struct OrderMessage<'a> {
    summary: &'a OrderSummary,
    sequence: u64,
}

impl fmt::Display for OrderMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        writeln!(f, "Order #{}", self.sequence)?;
        writeln!(f, "{GREETING}")?;
        writeln!(f)?;

        for line in &summary.lines {
            write!(
                f,
                "{}x {} @ {} = {}",
                line.quantity, line.name, line.unit_price, line.line_total
            )?;
            if !line.savings.amount.is_zero() {
                write!(f, " (you save {})", line.savings)?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;

        if !summary.savings.amount.is_zero() {
            writeln!(f, "Total Savings: {}", summary.savings)?;
        }
        writeln!(f, "Subtotal: {}", summary.subtotal)?;
        writeln!(f, "GST ({}): {}", summary.tax_rate, summary.tax)?;
        writeln!(f, "{FREIGHT_NOTE}")?;
        writeln!(f, "Total Amount (incl. GST): {}", summary.total)?;
        writeln!(f)?;
        f.write_str(CONTACT_REQUEST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::tests::product;

    #[test]
    fn test_message_layout() {
        let mut cart = Cart::new();
        cart.add(product(1, 550, Some(688)), 2);
        cart.add(product(2, 600, None), 1);

        let message = format_order_message(&cart, TaxRate::GST, 7);
        let expected = "\
Order #7
Hello! I'm interested in placing an order for:

2x AVR-01 @ ₹550/- = ₹1100/- (you save ₹276/-)
1x AVR-02 @ ₹600/- = ₹600/-

Total Savings: ₹276/-
Subtotal: ₹1700/-
GST (18%): ₹306/-
*Freight charges extra
Total Amount (incl. GST): ₹2006/-

Please contact me to proceed.";

        assert_eq!(message, expected);
    }

    #[test]
    fn test_message_omits_zero_savings() {
        let mut cart = Cart::new();
        cart.add(product(2, 600, None), 1);

        let message = format_order_message(&cart, TaxRate::GST, 1);

        assert!(!message.contains("Total Savings"));
        assert!(!message.contains("you save"));
        assert!(message.contains("Total Amount (incl. GST): ₹708/-"));
    }

    #[test]
    fn test_message_is_deterministic() {
        let mut cart = Cart::new();
        cart.add(product(1, 100, Some(125)), 2);

        assert_eq!(
            format_order_message(&cart, TaxRate::GST, 3),
            format_order_message(&cart, TaxRate::GST, 3)
        );
    }
}
