//! Variant identity: deciding when two cart lines are the same
//! purchasable unit.
//!
//! Identity is the triple (product id, normalized color, normalized
//! size). Color compares case-insensitively in lower case, size in upper
//! case, and absent attributes count as the empty string, so
//! `("Red", "m")` and `("red", "M")` are the same variant.

use seamline_core::ProductId;

use crate::api::types::{CartLineItem, VariantKey};

/// Normalize a color attribute: trimmed, lower-cased, absent becomes "".
#[must_use]
pub fn normalize_color(color: Option<&str>) -> String {
    color.map(|c| c.trim().to_lowercase()).unwrap_or_default()
}

/// Normalize a size attribute: trimmed, upper-cased, absent becomes "".
#[must_use]
pub fn normalize_size(size: Option<&str>) -> String {
    size.map(|s| s.trim().to_uppercase()).unwrap_or_default()
}

/// The normalized grouping key of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineIdentity {
    pub product_id: ProductId,
    pub color: String,
    pub size: String,
}

impl LineIdentity {
    /// Build an identity from raw attributes.
    #[must_use]
    pub fn new(product_id: ProductId, color: Option<&str>, size: Option<&str>) -> Self {
        Self {
            product_id,
            color: normalize_color(color),
            size: normalize_size(size),
        }
    }

    /// Build an identity from a product and its variant key.
    #[must_use]
    pub fn of(product_id: ProductId, variant: &VariantKey) -> Self {
        Self::new(product_id, variant.color.as_deref(), variant.size.as_deref())
    }
}

impl CartLineItem {
    /// The normalized grouping key of this line.
    #[must_use]
    pub fn identity(&self) -> LineIdentity {
        LineIdentity::new(self.product_id, self.color.as_deref(), self.size.as_deref())
    }
}

/// Whether two lines refer to the same purchasable unit.
#[must_use]
pub fn same_variant(a: &CartLineItem, b: &CartLineItem) -> bool {
    a.identity() == b.identity()
}

/// Position of the line matching the given product and variant.
#[must_use]
pub fn find_line(
    items: &[CartLineItem],
    product_id: ProductId,
    variant: &VariantKey,
) -> Option<usize> {
    let wanted = LineIdentity::of(product_id, variant);
    items.iter().position(|item| item.identity() == wanted)
}

/// Collapse same-identity entries into one (summing quantity; the first
/// occurrence keeps its position and display fields) and drop
/// zero-quantity entries. Every replacement of the cart's item sequence
/// goes through here, so duplicates never reach the UI.
#[must_use]
pub fn merge_lines(lines: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut merged: Vec<CartLineItem> = Vec::with_capacity(lines.len());

    for line in lines {
        let identity = line.identity();
        match merged.iter_mut().find(|m| m.identity() == identity) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }

    merged.retain(|line| line.quantity >= 1);
    merged
}
