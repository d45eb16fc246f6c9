//! Remote cart gateway.
//!
//! The cart is never cached: the server's view is authoritative after
//! every mutation, and the reconciliation service re-fetches it each
//! time. The gateway is a trait so the service can be exercised against
//! an in-memory fake.

use reqwest::Method;
use seamline_core::ProductId;
use tracing::instrument;

use super::types::{
    CartLineInput, CartLineItem, CartLineUpdate, CheckoutDetails, OrderConfirmation, VariantKey,
};
use super::{ApiClient, ApiError};

/// Remote operations on the server-side cart.
///
/// Every method may fail with [`ApiError::Unauthorized`] (no or invalid
/// session), [`ApiError::Validation`] (malformed quantity/variant), or a
/// transient transport error.
#[allow(async_fn_in_trait)]
pub trait CartGateway {
    /// Fetch the full authoritative cart.
    async fn fetch_cart(&self) -> Result<Vec<CartLineItem>, ApiError>;

    /// Add a line (or more of an existing line) to the cart.
    async fn add_item(
        &self,
        product_id: ProductId,
        input: &CartLineInput,
    ) -> Result<(), ApiError>;

    /// Set the quantity of an existing line, identified by product and
    /// variant.
    async fn update_item(
        &self,
        product_id: ProductId,
        update: &CartLineUpdate,
    ) -> Result<(), ApiError>;

    /// Remove the line matching the product and variant. Other variants
    /// of the same product are left alone.
    async fn remove_item(
        &self,
        product_id: ProductId,
        variant: &VariantKey,
    ) -> Result<(), ApiError>;

    /// Place the order for the current cart contents.
    async fn checkout(&self, details: &CheckoutDetails) -> Result<OrderConfirmation, ApiError>;
}

/// [`CartGateway`] over the commerce REST API.
#[derive(Clone)]
pub struct HttpCartGateway {
    api: ApiClient,
}

impl HttpCartGateway {
    /// Create a gateway over the given API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl CartGateway for HttpCartGateway {
    #[instrument(skip(self))]
    async fn fetch_cart(&self) -> Result<Vec<CartLineItem>, ApiError> {
        let request = self.api.request(Method::GET, "cart")?;
        self.api.send_json(request).await
    }

    #[instrument(skip(self, input), fields(product_id = %product_id))]
    async fn add_item(
        &self,
        product_id: ProductId,
        input: &CartLineInput,
    ) -> Result<(), ApiError> {
        let request = self
            .api
            .request(Method::POST, &format!("cart/products/{product_id}"))?
            .json(input);
        self.api.send_unit(request).await
    }

    #[instrument(skip(self, update), fields(product_id = %product_id))]
    async fn update_item(
        &self,
        product_id: ProductId,
        update: &CartLineUpdate,
    ) -> Result<(), ApiError> {
        let request = self
            .api
            .request(Method::PATCH, &format!("cart/products/{product_id}"))?
            .json(update);
        self.api.send_unit(request).await
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn remove_item(
        &self,
        product_id: ProductId,
        variant: &VariantKey,
    ) -> Result<(), ApiError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(color) = variant.color.as_deref() {
            query.push(("color", color));
        }
        if let Some(size) = variant.size.as_deref() {
            query.push(("size", size));
        }

        let request = self
            .api
            .request(Method::DELETE, &format!("cart/products/{product_id}"))?
            .query(&query);
        self.api.send_unit(request).await
    }

    #[instrument(skip(self, details))]
    async fn checkout(&self, details: &CheckoutDetails) -> Result<OrderConfirmation, ApiError> {
        let request = self
            .api
            .request(Method::POST, "cart/checkout")?
            .json(details);

        // Some deployments respond 204 with an empty body.
        let text = self.api.send_text(request).await?;
        if text.trim().is_empty() {
            return Ok(OrderConfirmation::default());
        }
        Ok(serde_json::from_str(&text)?)
    }
}
