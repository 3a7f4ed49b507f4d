//! Marketplace REST API client.
//!
//! # Architecture
//!
//! - Plain JSON-over-HTTP with `reqwest`; the server is the source of truth
//!   for catalog data, coupon rules, and stock
//! - In-memory caching via `moka` for product reads (5 minute TTL)
//! - No automatic retry: a failed call surfaces to the caller, who decides
//!   whether to re-trigger
//!
//! The engine consumes the client through the [`ProductCatalog`],
//! [`CouponValidator`], and [`OrderGateway`] traits so tests can substitute
//! in-process fakes without re-implementing any server-side rules - in
//! particular, discount computation stays behind [`CouponValidator`] and is
//! never evaluated client-side.

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use bazaar_core::{AppliedCoupon, CouponCode, Order, OrderId, Price, Product, ProductId};

use crate::cart::CartLine;
use crate::config::StorefrontConfig;

use types::{
    ApplyCouponRequest, CartLinePayload, CategoriesResponse, CreateOrderRequest,
    CreateOrderResponse, ErrorBody, OrderResponse, OrdersResponse, ProductQuery, ProductResponse,
    ProductsResponse, ValidateCouponRequest, ValidateCouponResponse,
};

/// Product cache TTL.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Product cache capacity.
const PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// Errors that can occur when calling the marketplace API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the request with an error message.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, shown inline to the shopper.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

// =============================================================================
// Collaborator traits
// =============================================================================

/// Read access to the product catalog.
pub trait ProductCatalog {
    /// Fetch a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the product does not exist, or a
    /// transport/API error otherwise.
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError>;
}

/// Coupon validation and redemption, delegated entirely to the server.
pub trait CouponValidator {
    /// Validate `code` against the current cart and return the granted
    /// discount. The client trusts the returned amount verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with the server's message when the coupon
    /// is invalid, expired, or inapplicable.
    async fn validate_coupon(
        &self,
        code: &CouponCode,
        order_total: Price,
        lines: &[CartLine],
    ) -> Result<AppliedCoupon, ApiError>;

    /// Mark `code` as used after a successful order.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails; callers treat this step as
    /// best-effort.
    async fn apply_coupon(&self, code: &CouponCode) -> Result<(), ApiError>;
}

/// Order submission and tracking.
pub trait OrderGateway {
    /// Submit an assembled order draft. Called at most once per draft.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] when the server rejects the order (e.g.,
    /// stock exhausted at submission time).
    async fn create_order(&self, draft: &CreateOrderRequest) -> Result<Order, ApiError>;
}

// =============================================================================
// MarketplaceClient
// =============================================================================

/// Client for the marketplace REST API.
///
/// Cheaply cloneable; product reads are cached for five minutes.
#[derive(Clone)]
pub struct MarketplaceClient {
    inner: Arc<MarketplaceClientInner>,
}

struct MarketplaceClientInner {
    client: reqwest::Client,
    base_url: Url,
    product_cache: Cache<ProductId, Product>,
}

impl MarketplaceClient {
    /// Create a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the auth token
    /// is not a valid header value.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.api_token {
            let value = format!("Bearer {}", token.expose_secret());
            let mut value = HeaderValue::from_str(&value).map_err(|e| ApiError::Api {
                status: 0,
                message: format!("invalid API token: {e}"),
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        let product_cache = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(MarketplaceClientInner {
                client,
                base_url: config.api_base_url.clone(),
                product_cache,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner.base_url.join(path).map_err(|e| ApiError::Api {
            status: 0,
            message: format!("invalid endpoint {path}: {e}"),
        })
    }

    /// Decode a response, mapping non-success statuses to [`ApiError`].
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            // The API reports rejections as {"message": "..."}; fall back to
            // the raw body for anything else
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map_or_else(|_| body.chars().take(200).collect(), |e| e.message);
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(message));
            }
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&impl Serialize>,
    ) -> Result<T, ApiError> {
        let mut request = self.inner.client.get(self.endpoint(path)?);
        if let Some(query) = query {
            request = request.query(query);
        }
        Self::decode(request.send().await?).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// List products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<ProductsResponse, ApiError> {
        self.get_json("products", Some(query)).await
    }

    /// List the known product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        let response: CategoriesResponse = self
            .get_json("products/categories/list", None::<&()>)
            .await?;
        Ok(response.categories)
    }

    /// List the authenticated user's orders, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        let response: OrdersResponse = self.get_json("orders", None::<&()>).await?;
        Ok(response.orders)
    }

    /// Fetch a single order by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order does not exist.
    #[instrument(skip(self))]
    pub async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let response: OrderResponse = self.get_json(&format!("orders/{id}"), None::<&()>).await?;
        Ok(response.order)
    }
}

impl ProductCatalog for MarketplaceClient {
    #[instrument(skip(self))]
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        if let Some(product) = self.inner.product_cache.get(id).await {
            tracing::debug!(product = %id, "product cache hit");
            return Ok(product);
        }

        let response: ProductResponse = self
            .get_json(&format!("products/{id}"), None::<&()>)
            .await?;

        self.inner
            .product_cache
            .insert(id.clone(), response.product.clone())
            .await;

        Ok(response.product)
    }
}

impl CouponValidator for MarketplaceClient {
    #[instrument(skip(self, lines))]
    async fn validate_coupon(
        &self,
        code: &CouponCode,
        order_total: Price,
        lines: &[CartLine],
    ) -> Result<AppliedCoupon, ApiError> {
        let request = ValidateCouponRequest {
            code: code.clone(),
            order_total,
            cart: lines.iter().map(CartLinePayload::from).collect(),
        };

        let response: ValidateCouponResponse =
            self.post_json("coupons/validate", &request).await?;
        Ok(AppliedCoupon::from(response))
    }

    #[instrument(skip(self))]
    async fn apply_coupon(&self, code: &CouponCode) -> Result<(), ApiError> {
        let request = ApplyCouponRequest { code: code.clone() };

        // The response body carries nothing the client uses
        let _: serde_json::Value = self.post_json("coupons/apply", &request).await?;
        Ok(())
    }
}

impl OrderGateway for MarketplaceClient {
    #[instrument(skip(self, draft))]
    async fn create_order(&self, draft: &CreateOrderRequest) -> Result<Order, ApiError> {
        let response: CreateOrderResponse = self.post_json("orders", draft).await?;
        Ok(response.order)
    }
}
