//! Order types as returned by the marketplace API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coupon::CouponCode;
use super::id::{OrderId, ProductId, VendorId};
use super::price::Price;
use super::status::{OrderStatus, PaymentMethod, PaymentStatus};

/// Shipping destination collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// One purchased line within an order.
///
/// Prices here are the snapshot values the order was placed with, not live
/// catalog prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The product this line refers to.
    pub product: ProductId,
    /// Product name at order time.
    pub name: String,
    /// Unit price at order time.
    pub price: Price,
    /// Units purchased.
    pub quantity: u32,
    /// Primary product image at order time.
    #[serde(default)]
    pub image: Option<String>,
    /// The vendor fulfilling this line.
    pub vendor: VendorId,
}

/// An order as stored by the marketplace, returned from order creation and
/// order tracking endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-assigned order ID.
    #[serde(rename = "_id")]
    pub id: OrderId,
    /// Purchased lines.
    pub items: Vec<OrderItem>,
    /// Fulfillment status.
    #[serde(default)]
    pub order_status: OrderStatus,
    /// Payment settlement status.
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Payment method chosen at checkout.
    pub payment_method: PaymentMethod,
    /// Shipping destination.
    pub shipping_address: ShippingAddress,
    /// Sum of line totals before shipping, tax, or discount.
    pub items_price: Price,
    /// Shipping charge.
    pub shipping_price: Price,
    /// Tax charge.
    pub tax_price: Price,
    /// Grand total actually charged.
    pub total_price: Price,
    /// Optional customer note.
    #[serde(default)]
    pub notes: Option<String>,
    /// Coupon code redeemed on this order, if any.
    #[serde(default)]
    pub coupon_code: Option<CouponCode>,
    /// Discount granted by the coupon, if any.
    #[serde(default)]
    pub coupon_discount: Option<Price>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}
