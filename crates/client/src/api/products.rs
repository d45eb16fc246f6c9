//! Product listing and detail endpoints.

use reqwest::Method;
use seamline_core::ProductId;
use tracing::instrument;

use super::types::{One, Product, ProductPage};
use super::{ApiClient, ApiError};

/// Raw query parameters for `GET /products`. The catalog layer builds
/// this from a validated [`crate::catalog::CatalogQuery`].
#[derive(Debug, Clone, Default)]
pub struct ProductListParams {
    pub page: Option<u32>,
    pub price_from: Option<u32>,
    pub price_to: Option<u32>,
    /// Sort key in wire form, e.g. `-created_at`, `price`, `-price`.
    pub sort: Option<String>,
}

impl ApiClient {
    /// Fetch one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is invalid.
    #[instrument(skip(self))]
    pub async fn fetch_products(
        &self,
        params: &ProductListParams,
    ) -> Result<ProductPage, ApiError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(page) = params.page {
            query.push(("page", page.to_string()));
        }
        if let Some(from) = params.price_from {
            query.push(("filter[price_from]", from.to_string()));
        }
        if let Some(to) = params.price_to {
            query.push(("filter[price_to]", to.to_string()));
        }
        if let Some(sort) = &params.sort {
            query.push(("sort", sort.clone()));
        }

        let request = self.request(Method::GET, "products")?.query(&query);
        self.send_json(request).await
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist, or any
    /// other error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn fetch_product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let request = self.request(Method::GET, &format!("products/{product_id}"))?;
        let text = self.send_text(request).await?;
        decode_product(&text)
    }
}

/// Decode a product detail response. The endpoint returns the bare
/// product object; some deployments wrap it in a `data` envelope like the
/// listing, so both shapes are accepted.
fn decode_product(body: &str) -> Result<Product, ApiError> {
    match serde_json::from_str::<Product>(body) {
        Ok(product) => Ok(product),
        Err(bare_err) => serde_json::from_str::<One<Product>>(body)
            .map(|envelope| envelope.data)
            .map_err(|_| ApiError::Parse(bare_err)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bare_product() {
        let product =
            decode_product(r#"{"id": 7, "name": "Tee", "price": 10}"#).unwrap();
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.name, "Tee");
    }

    #[test]
    fn test_decode_enveloped_product() {
        let product =
            decode_product(r#"{"data": {"id": 7, "name": "Tee", "price": "10"}}"#).unwrap();
        assert_eq!(product.id, ProductId::new(7));
    }

    #[test]
    fn test_decode_rejects_non_product_bodies() {
        assert!(matches!(
            decode_product(r#"{"message": "gone"}"#),
            Err(ApiError::Parse(_))
        ));
    }
}
