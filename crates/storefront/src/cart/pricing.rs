//! Pricing summary derivation.
//!
//! A pure computation over the current cart lines, recomputed from state
//! on every render rather than cached. Summation uses exact decimal
//! arithmetic; rounding to two places happens only in the display helpers.

use rust_decimal::Decimal;
use tradewind_core::{CurrencyCode, Price};

use crate::cart::CartLine;

/// Derived totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingSummary {
    /// Sum of list price x quantity over all lines.
    pub items_price: Decimal,
    /// Sum of (list price - effective price) x quantity; never negative.
    pub discount: Decimal,
    /// `items_price - discount`.
    pub total_amount: Decimal,
    /// Sum of quantities over all lines.
    pub item_count: u32,
    /// Currency of the summed amounts.
    pub currency_code: CurrencyCode,
}

impl PricingSummary {
    /// Compute the summary for a snapshot of cart lines.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let mut items_price = Decimal::ZERO;
        let mut discount = Decimal::ZERO;
        let mut item_count: u32 = 0;
        let currency_code = lines
            .first()
            .map_or_else(CurrencyCode::default, |line| line.price.currency_code);

        for line in lines {
            let quantity = Decimal::from(line.quantity);
            let per_unit_discount =
                (line.price.amount - line.effective_price().amount).max(Decimal::ZERO);

            items_price += line.price.amount * quantity;
            discount += per_unit_discount * quantity;
            item_count = item_count.saturating_add(line.quantity);
        }

        Self {
            items_price,
            discount,
            total_amount: items_price - discount,
            item_count,
            currency_code,
        }
    }

    /// Items price formatted for display.
    #[must_use]
    pub fn items_price_display(&self) -> String {
        Price::new(self.items_price, self.currency_code).display()
    }

    /// Discount formatted for display.
    #[must_use]
    pub fn discount_display(&self) -> String {
        Price::new(self.discount, self.currency_code).display()
    }

    /// Total formatted for display.
    #[must_use]
    pub fn total_display(&self) -> String {
        Price::new(self.total_amount, self.currency_code).display()
    }
}
