//! Shared fixtures for Bazaar integration tests.
//!
//! [`MockMarketplace`] stands in for the remote REST API behind the same
//! collaborator traits the real [`MarketplaceClient`] implements, so the
//! full cart -> coupon -> checkout flow can run in-process. Discount rules
//! live here exactly as they would server-side: the engine under test never
//! evaluates them itself.
//!
//! [`MarketplaceClient`]: bazaar_storefront::api::MarketplaceClient

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;

use bazaar_core::{
    AppliedCoupon, CouponCode, Order, OrderId, OrderStatus, PaymentStatus, Price, Product,
    ProductId, ProductSnapshot, VendorId,
};
use bazaar_storefront::api::types::CreateOrderRequest;
use bazaar_storefront::api::{ApiError, CouponValidator, OrderGateway, ProductCatalog};
use bazaar_storefront::cart::CartLine;

/// A coupon rule the mock server knows about.
#[derive(Debug, Clone)]
pub struct CouponRule {
    pub discount: Price,
    pub description: String,
}

/// In-process stand-in for the marketplace REST API.
#[derive(Debug, Default)]
pub struct MockMarketplace {
    /// Catalog served by [`ProductCatalog::product`].
    pub products: Vec<Product>,
    /// Known coupons, keyed by normalized code.
    pub coupons: HashMap<String, CouponRule>,
    /// When set, order creation fails with this message.
    pub reject_orders_with: Option<String>,
    /// When true, `POST /coupons/apply` fails.
    pub fail_coupon_apply: bool,
    /// Every order draft accepted, in submission order.
    pub accepted_drafts: Mutex<Vec<CreateOrderRequest>>,
    /// Every coupon code marked as used.
    pub redeemed_codes: Mutex<Vec<CouponCode>>,
}

impl MockMarketplace {
    /// A mock with the standard two-product catalog and a $10 coupon.
    #[must_use]
    pub fn with_standard_catalog() -> Self {
        let mut coupons = HashMap::new();
        coupons.insert(
            "SAVE10".to_string(),
            CouponRule {
                discount: Price::from_major(10),
                description: "Ten dollars off".to_string(),
            },
        );

        Self {
            products: vec![
                product("p-desk", "Walnut Desk Organizer", 2000, 10),
                product("p-mug", "Ceramic Mug", 1500, 10),
            ],
            coupons,
            ..Self::default()
        }
    }

    /// Number of orders accepted so far.
    #[must_use]
    pub fn orders_accepted(&self) -> usize {
        self.accepted_drafts.lock().unwrap().len()
    }
}

impl ProductCatalog for MockMarketplace {
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))
    }
}

impl CouponValidator for MockMarketplace {
    async fn validate_coupon(
        &self,
        code: &CouponCode,
        _order_total: Price,
        _lines: &[CartLine],
    ) -> Result<AppliedCoupon, ApiError> {
        let rule = self.coupons.get(code.as_str()).ok_or_else(|| ApiError::Api {
            status: 400,
            message: "Invalid coupon code".to_string(),
        })?;

        Ok(AppliedCoupon {
            code: code.clone(),
            discount: rule.discount,
            description: rule.description.clone(),
        })
    }

    async fn apply_coupon(&self, code: &CouponCode) -> Result<(), ApiError> {
        if self.fail_coupon_apply {
            return Err(ApiError::Api {
                status: 500,
                message: "coupon usage tracking unavailable".to_string(),
            });
        }
        self.redeemed_codes.lock().unwrap().push(code.clone());
        Ok(())
    }
}

impl OrderGateway for MockMarketplace {
    async fn create_order(&self, draft: &CreateOrderRequest) -> Result<Order, ApiError> {
        if let Some(message) = &self.reject_orders_with {
            return Err(ApiError::Api {
                status: 400,
                message: message.clone(),
            });
        }

        let seq = {
            let mut drafts = self.accepted_drafts.lock().unwrap();
            drafts.push(draft.clone());
            drafts.len()
        };

        Ok(Order {
            id: OrderId::new(format!("ord-{seq}")),
            items: draft.items.clone(),
            order_status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: draft.payment_method,
            shipping_address: draft.shipping_address.clone(),
            items_price: draft.items_price,
            shipping_price: draft.shipping_price,
            tax_price: draft.tax_price,
            total_price: draft.total_price,
            notes: draft.notes.clone(),
            coupon_code: draft.coupon_code.clone(),
            coupon_discount: draft.coupon_discount,
            created_at: chrono::DateTime::UNIX_EPOCH,
        })
    }
}

/// A filled-in checkout form for tests that don't care about its contents.
#[must_use]
pub fn checkout_form() -> bazaar_storefront::checkout::CheckoutForm {
    bazaar_storefront::checkout::CheckoutForm {
        shipping_address: bazaar_core::ShippingAddress {
            street: "12 Market Way".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            zip_code: "97201".to_string(),
            country: "USA".to_string(),
        },
        payment_method: bazaar_core::PaymentMethod::CreditCard,
        notes: None,
    }
}

/// Build a catalog product.
#[must_use]
pub fn product(id: &str, name: &str, price_cents: i64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: String::new(),
        price: Price::from_cents(price_cents),
        stock,
        images: vec![format!("https://cdn.example.com/{id}.jpg")],
        category: "Test".to_string(),
        vendor: VendorId::new("v-1"),
        featured: false,
        average_rating: None,
    }
}

/// Build a snapshot directly, for carts assembled without a catalog fetch.
#[must_use]
pub fn snapshot(id: &str, price_cents: i64, stock: u32) -> ProductSnapshot {
    product(id, &format!("Product {id}"), price_cents, stock).snapshot()
}
