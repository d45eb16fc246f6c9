//! Cart aggregates: subtotal, item count, and order totals.

use rust_decimal::Decimal;

use crate::api::types::CartLineItem;

/// Flat delivery fee applied to non-empty orders.
pub const DELIVERY_FEE_UNITS: u32 = 5;

/// Sum of `unit_price x quantity` over all lines. Empty input yields 0.
/// Non-numeric wire values were already coerced to 0 at decode time.
#[must_use]
pub fn subtotal(items: &[CartLineItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.unit_price * Decimal::from(item.quantity))
        .sum()
}

/// Total quantity across all lines. Empty input yields 0.
#[must_use]
pub fn total_quantity(items: &[CartLineItem]) -> u32 {
    items
        .iter()
        .fold(0, |sum, item| sum.saturating_add(item.quantity))
}

/// Order totals as shown in the drawer and at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub delivery: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Derive totals for the given lines: the flat delivery fee applies
    /// only when the cart is non-empty.
    #[must_use]
    pub fn for_items(items: &[CartLineItem]) -> Self {
        let subtotal = subtotal(items);
        let delivery = if items.is_empty() {
            Decimal::ZERO
        } else {
            Decimal::from(DELIVERY_FEE_UNITS)
        };

        Self {
            subtotal,
            delivery,
            total: subtotal + delivery,
        }
    }
}
