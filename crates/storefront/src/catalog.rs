//! Product catalog with client-side filtering.
//!
//! The full listing is fetched once and cached for 5 minutes with `moka`;
//! text search and category filtering run locally over the cached list.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use tienda_core::CategoryId;

use crate::api::{ApiClient, ApiError};
use crate::models::Product;
use crate::session::Session;

const PRODUCTS_CACHE_KEY: &str = "products";

/// Read-only catalog view over the backend's product listing.
///
/// Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct CatalogView {
    api: ApiClient,
    cache: Cache<String, Arc<Vec<Product>>>,
}

impl CatalogView {
    /// Create a catalog view with a 5-minute product cache.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();
        Self { api, cache }
    }

    /// The product listing, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing must be fetched and the request
    /// fails.
    #[instrument(skip(self, session))]
    pub async fn products(&self, session: &Session) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(products) = self.cache.get(PRODUCTS_CACHE_KEY).await {
            debug!("cache hit for product listing");
            return Ok(products);
        }

        let products = Arc::new(self.api.list_products(session).await?);
        self.cache
            .insert(PRODUCTS_CACHE_KEY.to_string(), products.clone())
            .await;
        Ok(products)
    }

    /// Drop the cached listing so the next read refetches.
    pub async fn invalidate(&self) {
        self.cache.invalidate(PRODUCTS_CACHE_KEY).await;
    }
}

/// Filter a product list by free-text query and category.
///
/// The query matches case-insensitively against name and description; an
/// empty or whitespace query matches everything. Both filters compose with
/// AND.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    query: &str,
    category: Option<CategoryId>,
) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| category.is_none_or(|c| p.category_id == Some(c)))
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect()
}
