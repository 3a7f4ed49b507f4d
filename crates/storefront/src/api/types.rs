//! Wire types for the marketplace REST API.
//!
//! These mirror the server's JSON contracts: camelCase field names, decimal
//! amounts carried as strings. They are kept separate from the engine's own
//! types so the wire shape can drift without touching cart or pricing code.

use serde::{Deserialize, Serialize};

use bazaar_core::{
    AppliedCoupon, CouponCode, Order, OrderItem, PaymentMethod, Price, Product, ProductSnapshot,
    ShippingAddress,
};

use crate::cart::CartLine;

// =============================================================================
// Coupon endpoints
// =============================================================================

/// Request body for `POST /coupons/validate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    /// Normalized coupon code.
    pub code: CouponCode,
    /// The cart subtotal the discount is evaluated against.
    pub order_total: Price,
    /// The full cart, so the server can check per-product rules.
    pub cart: Vec<CartLinePayload>,
}

/// One cart line as sent to the coupon validator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinePayload {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl From<&CartLine> for CartLinePayload {
    fn from(line: &CartLine) -> Self {
        Self {
            product: line.product.clone(),
            quantity: line.quantity,
        }
    }
}

/// Response body for `POST /coupons/validate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponResponse {
    pub coupon: CouponInfo,
    /// Discount amount computed server-side, trusted verbatim.
    pub discount: Price,
}

/// Coupon metadata within a validation response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponInfo {
    pub code: CouponCode,
    #[serde(default)]
    pub description: String,
}

impl From<ValidateCouponResponse> for AppliedCoupon {
    fn from(response: ValidateCouponResponse) -> Self {
        Self {
            code: response.coupon.code,
            discount: response.discount,
            description: response.coupon.description,
        }
    }
}

/// Request body for `POST /coupons/apply` (mark the coupon as used).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCouponRequest {
    pub code: CouponCode,
}

// =============================================================================
// Order endpoints
// =============================================================================

/// Request body for `POST /orders` - the assembled order draft.
///
/// Built at submission time from the cart, the price breakdown, and the
/// checkout form; sent once and never retried automatically.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub items_price: Price,
    pub shipping_price: Price,
    pub tax_price: Price,
    pub total_price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<CouponCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_discount: Option<Price>,
}

/// Response body for `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub order: Order,
}

/// Response body for `GET /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

/// Response body for `GET /orders/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    pub order: Order,
}

// =============================================================================
// Catalog endpoints
// =============================================================================

/// Query parameters for `GET /products`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Response body for `GET /products`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
}

/// Response body for `GET /products/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// Response body for `GET /products/categories/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

// =============================================================================
// Errors
// =============================================================================

/// Error body returned by the marketplace API on rejections.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
