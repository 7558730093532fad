//! REST client for the remote store API.
//!
//! Uses `reqwest` for HTTP. Catalog reads are cached with `moka`
//! (5-minute TTL); cart endpoints are never cached - mutable state.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use tradewind_core::{ProductId, UserId};

use crate::api::{ApiError, CartLineRequest, ErrorEnvelope};
use crate::cart::model::CartBackend;
use crate::cart::CartLine;
use crate::catalog::Product;
use crate::config::StoreConfig;

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cached catalog values.
#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}

/// Client for the remote store API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: String,
    cache: Cache<String, CacheValue>,
}

impl StoreClient {
    /// Create a new store API client from configuration.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(StoreClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                api_token: config.api_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::NotFound(format!("invalid endpoint {path}: {e}")))
    }

    /// Send a request and decode the JSON response, mapping failure
    /// envelopes to `ApiError::Status` with the server message verbatim.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .bearer_auth(&self.inner.api_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        // Body as text first for better error diagnostics.
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body).map_or_else(
                |_| format!("HTTP {status}"),
                |envelope| envelope.message,
            );
            tracing::warn!(status = %status, message = %message, "store API returned failure");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "failed to parse store API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&format!("products/{product_id}"))?;
        let product: Product = self.execute(self.inner.client.get(url)).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get the product list, optionally filtered by a search query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, query: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let cache_key = format!("products:{}", query.unwrap_or(""));

        // Only default listings are cached, not searches.
        if query.is_none()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("cache hit for products");
            return Ok(products);
        }

        let mut url = self.endpoint("products")?;
        if let Some(q) = query {
            url.query_pairs_mut().append_pair("search", q);
        }
        let products: Vec<Product> = self.execute(self.inner.client.get(url)).await?;

        if query.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, product_id: &ProductId) {
        self.inner
            .cache
            .invalidate(&format!("product:{product_id}"))
            .await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    async fn cart_request<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        user: &UserId,
        body: Option<&B>,
    ) -> Result<Vec<CartLine>, ApiError> {
        let url = self.endpoint(&format!("{user}/cart"))?;
        let mut request = self.inner.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await
    }
}

impl CartBackend for StoreClient {
    #[instrument(skip(self), fields(user = %user))]
    async fn fetch_cart(&self, user: &UserId) -> Result<Vec<CartLine>, ApiError> {
        self.cart_request::<()>(reqwest::Method::GET, user, None)
            .await
    }

    #[instrument(skip(self, request), fields(user = %user, variant = %request.variant_id))]
    async fn add_line(
        &self,
        user: &UserId,
        request: &CartLineRequest,
    ) -> Result<Vec<CartLine>, ApiError> {
        self.cart_request(reqwest::Method::POST, user, Some(request))
            .await
    }

    #[instrument(skip(self, request), fields(user = %user, variant = %request.variant_id))]
    async fn update_line(
        &self,
        user: &UserId,
        request: &CartLineRequest,
    ) -> Result<Vec<CartLine>, ApiError> {
        self.cart_request(reqwest::Method::PUT, user, Some(request))
            .await
    }

    #[instrument(skip(self, request), fields(user = %user, variant = %request.variant_id))]
    async fn remove_line(
        &self,
        user: &UserId,
        request: &CartLineRequest,
    ) -> Result<Vec<CartLine>, ApiError> {
        self.cart_request(reqwest::Method::DELETE, user, Some(request))
            .await
    }
}
