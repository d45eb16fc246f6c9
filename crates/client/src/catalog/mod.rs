//! Product browsing: filters, sort, pagination, and the cached catalog
//! client.
//!
//! Listings and products are cached with `moka` (5-minute TTL); filtered
//! queries bypass the cache. The cart is never served from here.

mod cache;
pub mod filters;
pub mod pagination;

pub use filters::{FilterError, PriceFilter, SortKey, sanitize_number_input};
pub use pagination::{PageItem, page_items, parse_page_from_url};

use std::time::Duration;

use moka::future::Cache;
use seamline_core::ProductId;
use tracing::{debug, instrument};

use crate::api::products::ProductListParams;
use crate::api::types::{Product, ProductPage};
use crate::api::{ApiClient, ApiError};

use cache::CacheValue;

/// Default listing page size when the API omits `per_page`.
pub const PAGE_SIZE: u32 = 10;

/// A validated listing query.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// 1-based page number; 0 is treated as 1.
    pub page: u32,
    pub filter: PriceFilter,
    pub sort: SortKey,
}

impl CatalogQuery {
    fn page_number(&self) -> u32 {
        self.page.max(1)
    }

    fn list_params(&self, page: u32) -> ProductListParams {
        ProductListParams {
            page: Some(page),
            price_from: self.filter.from,
            price_to: self.filter.to,
            sort: Some(self.sort.as_query().to_string()),
        }
    }
}

/// A listing page plus derived paging facts for the pager.
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub page: u32,
    pub per_page: u32,
    /// Exact item count when it could be derived.
    pub total: Option<u32>,
    /// Last page number when the API exposed one.
    pub total_pages: Option<u32>,
}

/// Client for the product catalog.
///
/// Wraps [`ApiClient`] with an in-memory cache (capacity 1000, 5-minute
/// TTL). Mutable state (the cart) never goes through this client.
#[derive(Clone)]
pub struct CatalogClient {
    api: ApiClient,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a catalog client over the given API client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self { api, cache }
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist, or any
    /// other error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product = self.api.fetch_product(product_id).await?;

        self.cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &CatalogQuery) -> Result<ProductPage, ApiError> {
        let page = query.page_number();
        let cache_key = format!("products:{page}:{}", query.sort.as_query());

        // Check cache (only for unfiltered listings)
        if query.filter.is_empty()
            && let Some(CacheValue::Page(cached)) = self.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(*cached);
        }

        let result = self.api.fetch_products(&query.list_params(page)).await?;

        if query.filter.is_empty() {
            self.cache
                .insert(cache_key, CacheValue::Page(Box::new(result.clone())))
                .await;
        }

        Ok(result)
    }

    /// Get one page of products plus derived paging facts.
    ///
    /// When the API's `last` link points past page 1 and we are on the
    /// first page, the last page is fetched once to count its items and
    /// derive the exact total: `(last - 1) x per_page + count_on_last`.
    /// Otherwise the total comes from the page metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn listing(&self, query: &CatalogQuery) -> Result<ProductListing, ApiError> {
        let page_number = query.page_number();
        let page = self.products(query).await?;

        let per_page = if page.meta.per_page == 0 {
            PAGE_SIZE
        } else {
            page.meta.per_page
        };

        let last_page = page
            .links
            .last
            .as_deref()
            .and_then(parse_page_from_url)
            .filter(|&p| p > 1);

        let total = match last_page {
            Some(last) if page_number == 1 => {
                let last_query = CatalogQuery {
                    page: last,
                    ..query.clone()
                };
                let tail = self.products(&last_query).await?;
                let count_on_last = u32::try_from(tail.data.len()).unwrap_or(0);
                Some(exact_total(last, per_page, count_on_last))
            }
            Some(_) => None,
            None => page.meta.to,
        };

        let total_pages = last_page.or_else(|| total.map(|t| t.div_ceil(per_page).max(1)));

        Ok(ProductListing {
            products: page.data,
            page: page_number,
            per_page,
            total,
            total_pages,
        })
    }
}

/// Exact item count given the last page number and how many items the
/// last page actually holds.
const fn exact_total(last_page: u32, per_page: u32, count_on_last: u32) -> u32 {
    last_page.saturating_sub(1) * per_page + count_on_last
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_total_counts_partial_last_page() {
        assert_eq!(exact_total(5, 10, 3), 43);
        assert_eq!(exact_total(5, 10, 10), 50);
        assert_eq!(exact_total(1, 10, 4), 4);
    }

    #[test]
    fn test_catalog_query_defaults() {
        let query = CatalogQuery::default();
        assert_eq!(query.page_number(), 1);
        assert_eq!(query.sort, SortKey::NewestFirst);
        assert!(query.filter.is_empty());
    }

    #[test]
    fn test_list_params_carry_filter_and_sort() {
        let query = CatalogQuery {
            page: 2,
            filter: PriceFilter::parse("10", "100").unwrap(),
            sort: SortKey::PriceDesc,
        };
        let params = query.list_params(query.page_number());
        assert_eq!(params.page, Some(2));
        assert_eq!(params.price_from, Some(10));
        assert_eq!(params.price_to, Some(100));
        assert_eq!(params.sort.as_deref(), Some("-price"));
    }
}
