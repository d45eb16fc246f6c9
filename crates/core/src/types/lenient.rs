//! Lenient serde deserializers for tolerant wire decoding.
//!
//! The commerce API is not strict about numeric fields: prices arrive as
//! JSON numbers or as numeric strings, and malformed records do show up.
//! These helpers coerce anything non-numeric to zero instead of failing
//! the whole response.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a `Decimal` from a JSON number, a numeric string, or
/// anything else (which coerces to zero).
///
/// # Errors
///
/// Only fails if the underlying JSON is malformed; unexpected value
/// shapes coerce to zero.
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_decimal(&value))
}

/// Deserialize a `u32` quantity from a JSON number, a numeric string, or
/// anything else (which coerces to zero).
///
/// # Errors
///
/// Only fails if the underlying JSON is malformed.
pub fn quantity_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_quantity(&value))
}

fn coerce_decimal(value: &Value) -> Decimal {
    match value {
        // Route through the string form so both integers and floats parse
        // without an intermediate f64 conversion.
        Value::Number(n) => n.to_string().parse().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

fn coerce_quantity(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n.as_u64().and_then(|q| u32::try_from(q).ok()).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Line {
        #[serde(deserialize_with = "decimal_or_zero")]
        price: Decimal,
        #[serde(deserialize_with = "quantity_or_zero")]
        quantity: u32,
    }

    #[test]
    fn test_numeric_fields() {
        let line: Line = serde_json::from_str(r#"{"price": 10.5, "quantity": 2}"#).unwrap();
        assert_eq!(line.price, Decimal::new(105, 1));
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_string_coercible_fields() {
        let line: Line = serde_json::from_str(r#"{"price": "5", "quantity": " 3 "}"#).unwrap();
        assert_eq!(line.price, Decimal::new(5, 0));
        assert_eq!(line.quantity, 3);
    }

    #[test]
    fn test_junk_coerces_to_zero() {
        let line: Line =
            serde_json::from_str(r#"{"price": "not a price", "quantity": null}"#).unwrap();
        assert_eq!(line.price, Decimal::ZERO);
        assert_eq!(line.quantity, 0);
    }

    #[test]
    fn test_negative_quantity_coerces_to_zero() {
        let line: Line = serde_json::from_str(r#"{"price": [], "quantity": -4}"#).unwrap();
        assert_eq!(line.price, Decimal::ZERO);
        assert_eq!(line.quantity, 0);
    }
}
