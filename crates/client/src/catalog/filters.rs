//! Listing filters and sort keys.

use std::str::FromStr;

use thiserror::Error;

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest products first (the listing default).
    #[default]
    NewestFirst,
    /// Price, low to high.
    PriceAsc,
    /// Price, high to low.
    PriceDesc,
}

impl SortKey {
    /// Wire form of the sort key, as the API expects it.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::NewestFirst => "-created_at",
            Self::PriceAsc => "price",
            Self::PriceDesc => "-price",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NewestFirst => "New products first",
            Self::PriceAsc => "Price, low to high",
            Self::PriceDesc => "Price, high to low",
        }
    }
}

/// Error parsing a sort key from its wire form.
#[derive(Debug, Error)]
#[error("unknown sort key: {0} (expected -created_at, price, or -price)")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-created_at" | "newest" => Ok(Self::NewestFirst),
            "price" => Ok(Self::PriceAsc),
            "-price" => Ok(Self::PriceDesc),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

/// Keep only the ASCII digits of a raw input string.
#[must_use]
pub fn sanitize_number_input(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Error validating a price range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The lower bound exceeds the upper bound.
    #[error("'from' must be less than or equal to 'to'")]
    InvertedRange,
}

/// A validated price range filter. Empty bounds are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceFilter {
    pub from: Option<u32>,
    pub to: Option<u32>,
}

impl PriceFilter {
    /// Parse a filter from raw user input. Non-digit characters are
    /// stripped; an input with no digits left is an unbounded side.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvertedRange` when both bounds are present
    /// and `from > to`.
    pub fn parse(from: &str, to: &str) -> Result<Self, FilterError> {
        let from = parse_bound(from);
        let to = parse_bound(to);

        if let (Some(f), Some(t)) = (from, to)
            && f > t
        {
            return Err(FilterError::InvertedRange);
        }

        Ok(Self { from, to })
    }

    /// Whether the filter places no bounds on the listing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

fn parse_bound(raw: &str) -> Option<u32> {
    let digits = sanitize_number_input(raw);
    if digits.is_empty() {
        return None;
    }
    // All-digit input can only fail to parse by overflowing; clamp it.
    Some(digits.parse().unwrap_or(u32::MAX))
}
