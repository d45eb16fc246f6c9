//! Wire and domain types for the commerce API.
//!
//! List endpoints use a Laravel-style envelope (`data`/`meta`/`links`);
//! the cart endpoint returns a bare JSON array of line items. Numeric
//! fields are decoded leniently (see `seamline_core::types::lenient`)
//! because prices arrive as numbers or numeric strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use seamline_core::types::lenient;
use seamline_core::{Email, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog
// =============================================================================

/// A product's brand as shown on the detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A purchasable product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::decimal_or_zero", default)]
    pub price: Decimal,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub available_colors: Vec<String>,
    #[serde(default)]
    pub available_sizes: Vec<String>,
    #[serde(default)]
    pub release_year: Option<String>,
    #[serde(default)]
    pub brand: Option<Brand>,
    /// Server-side creation time; drives the default listing order.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One page of a product listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub data: Vec<Product>,
    #[serde(default)]
    pub meta: PageMeta,
    #[serde(default)]
    pub links: PageLinks,
}

/// Paging metadata for a listing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub per_page: u32,
    /// Absolute index of the first item on this page (1-based).
    #[serde(default)]
    pub from: Option<u32>,
    /// Absolute index of the last item on this page (1-based).
    #[serde(default)]
    pub to: Option<u32>,
}

/// Paging links for a listing page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Envelope for single-resource responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct One<T> {
    pub data: T,
}

// =============================================================================
// Cart
// =============================================================================

/// The color/size pair that, together with the product id, identifies a
/// cart line. Absent fields participate in identity as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl VariantKey {
    /// A variant with both attributes set.
    #[must_use]
    pub fn new(color: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            size: Some(size.into()),
        }
    }
}

/// One line in the shopping cart.
///
/// Field names follow the domain; serde renames map them onto the wire
/// shape so the persisted mirror and the API payloads stay identical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    #[serde(deserialize_with = "lenient::quantity_or_zero", default)]
    pub quantity: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(
        rename = "price",
        deserialize_with = "lenient::decimal_or_zero",
        default
    )]
    pub unit_price: Decimal,
    #[serde(rename = "name", default)]
    pub display_name: String,
    #[serde(rename = "cover_image", default)]
    pub image_url: Option<String>,
}

impl CartLineItem {
    /// A local-only line created by an optimistic add before the server
    /// has confirmed it. Display fields are filled in by the next
    /// authoritative refresh.
    #[must_use]
    pub fn placeholder(product_id: ProductId, variant: &VariantKey, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
            color: variant.color.clone(),
            size: variant.size.clone(),
            unit_price: Decimal::ZERO,
            display_name: String::new(),
            image_url: None,
        }
    }

    /// The variant attributes of this line.
    #[must_use]
    pub fn variant(&self) -> VariantKey {
        VariantKey {
            color: self.color.clone(),
            size: self.size.clone(),
        }
    }
}

/// Body of an add-to-cart request.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineInput {
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Body of a cart line update. Carries the variant disambiguator because
/// several variants of one product may coexist as distinct lines.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineUpdate {
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

// =============================================================================
// Checkout
// =============================================================================

/// Contact and address details for checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutDetails {
    pub name: String,
    pub surname: String,
    pub email: Email,
    pub address: String,
    pub zip_code: String,
}

/// Confirmation returned by a successful checkout. The API is loose about
/// this shape, so every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderConfirmation {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Auth
// =============================================================================

/// A signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Response from login/register: the bearer token plus the user record.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_wire_names_roundtrip() {
        let json = r#"{
            "id": 7,
            "quantity": 2,
            "color": "Red",
            "size": "M",
            "price": "19.99",
            "name": "Linen Shirt",
            "cover_image": "https://cdn.example.com/shirt.jpg"
        }"#;
        let line: CartLineItem = serde_json::from_str(json).unwrap();
        assert_eq!(line.product_id, ProductId::new(7));
        assert_eq!(line.unit_price, Decimal::new(1999, 2));
        assert_eq!(line.display_name, "Linen Shirt");

        // The mirror serializes back to the same wire names.
        let back = serde_json::to_value(&line).unwrap();
        assert_eq!(back["id"], 7);
        assert_eq!(back["name"], "Linen Shirt");
        assert!(back["cover_image"].is_string());
    }

    #[test]
    fn test_cart_line_tolerates_sparse_records() {
        let line: CartLineItem = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(line.quantity, 0);
        assert_eq!(line.unit_price, Decimal::ZERO);
        assert!(line.color.is_none());
    }

    #[test]
    fn test_product_brand_is_optional() {
        let bare: Product = serde_json::from_str(r#"{"id": 1, "name": "Tee"}"#).unwrap();
        assert!(bare.brand.is_none());

        let branded: Product = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Tee",
                "brand": {"name": "Acme", "image": "https://cdn.example.com/acme.png"}
            }"#,
        )
        .unwrap();
        let brand = branded.brand.unwrap();
        assert_eq!(brand.name, "Acme");
        assert!(brand.image.is_some());
    }

    #[test]
    fn test_product_page_envelope() {
        let json = r#"{
            "data": [{"id": 1, "name": "Tee", "price": 10}],
            "meta": {"current_page": 1, "per_page": 10, "from": 1, "to": 1},
            "links": {"last": "https://api.example.com/products?page=1"}
        }"#;
        let page: ProductPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.meta.per_page, 10);
        assert!(page.links.next.is_none());
    }

    #[test]
    fn test_line_update_omits_absent_variant_fields() {
        let update = CartLineUpdate {
            quantity: 3,
            color: None,
            size: Some("M".to_string()),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("color").is_none());
        assert_eq!(json["size"], "M");
    }
}
