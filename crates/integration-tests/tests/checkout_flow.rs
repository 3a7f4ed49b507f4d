//! End-to-end checkout flows against the mock marketplace.
//!
//! These exercise the full engine path: persisted cart -> snapshot refresh
//! -> coupon validation -> pricing -> order submission -> settlement.

#![allow(clippy::unwrap_used)]

use bazaar_core::{CouponCode, Price, ProductId};
use bazaar_integration_tests::{MockMarketplace, checkout_form, snapshot};
use bazaar_storefront::api::ApiError;
use bazaar_storefront::cart::{CartOwner, CartStore, InMemoryCartRepository};
use bazaar_storefront::checkout::{self, CheckoutError, CouponSession};

fn open_cart() -> CartStore {
    CartStore::open(
        CartOwner::Anonymous,
        Box::new(InMemoryCartRepository::default()),
    )
    .unwrap()
}

#[tokio::test]
async fn checkout_happy_path_submits_breakdown_and_clears_cart() {
    let marketplace = MockMarketplace::with_standard_catalog();
    let mut cart = open_cart();
    cart.add_item(snapshot("p-desk", 2000, 10), 2).unwrap();
    cart.add_item(snapshot("p-mug", 1500, 10), 1).unwrap();

    let mut coupons = CouponSession::new();
    let order = checkout::place_order(&mut cart, &mut coupons, checkout_form(), &marketplace)
        .await
        .unwrap();

    // subtotal 55.00 -> free shipping, tax 5.50, total 60.50
    assert_eq!(order.items_price, Price::from_cents(5500));
    assert_eq!(order.shipping_price, Price::ZERO);
    assert_eq!(order.tax_price.rounded().to_string(), "5.50");
    assert_eq!(order.total_price, Price::from_cents(6050));

    assert!(cart.is_empty());
    assert_eq!(marketplace.orders_accepted(), 1);

    let drafts = marketplace.accepted_drafts.lock().unwrap();
    assert_eq!(drafts[0].items.len(), 2);
    assert_eq!(drafts[0].items[0].quantity, 2);
    assert!(drafts[0].coupon_code.is_none());
}

#[tokio::test]
async fn checkout_with_coupon_discounts_total_and_redeems_code() {
    let marketplace = MockMarketplace::with_standard_catalog();
    let mut cart = open_cart();
    cart.add_item(snapshot("p-desk", 2000, 10), 2).unwrap();
    cart.add_item(snapshot("p-mug", 1500, 10), 1).unwrap();

    let mut coupons = CouponSession::new();
    coupons
        .apply(
            &marketplace,
            CouponCode::parse("save10").unwrap(),
            cart.lines(),
        )
        .await
        .unwrap();

    let order = checkout::place_order(&mut cart, &mut coupons, checkout_form(), &marketplace)
        .await
        .unwrap();

    assert_eq!(order.total_price, Price::from_cents(5050));
    assert_eq!(order.coupon_discount, Some(Price::from_major(10)));

    // The redemption call fired exactly once, after order creation
    let redeemed = marketplace.redeemed_codes.lock().unwrap();
    assert_eq!(redeemed.as_slice(), &[CouponCode::parse("SAVE10").unwrap()]);

    // The session is spent; a new checkout starts without a coupon
    assert!(coupons.applied().is_none());
}

#[tokio::test]
async fn rejected_order_leaves_cart_and_coupon_intact() {
    let marketplace = MockMarketplace {
        reject_orders_with: Some("Insufficient stock for Ceramic Mug".to_string()),
        ..MockMarketplace::with_standard_catalog()
    };
    let mut cart = open_cart();
    cart.add_item(snapshot("p-mug", 1500, 10), 4).unwrap();

    let mut coupons = CouponSession::new();
    coupons
        .apply(
            &marketplace,
            CouponCode::parse("SAVE10").unwrap(),
            cart.lines(),
        )
        .await
        .unwrap();

    let err = checkout::place_order(&mut cart, &mut coupons, checkout_form(), &marketplace)
        .await
        .unwrap_err();

    // The stock error surfaces verbatim; nothing local is auto-corrected
    assert_eq!(err.to_string(), "Insufficient stock for Ceramic Mug");
    assert_eq!(cart.count(), 4);
    assert!(coupons.applied().is_some());
    assert!(marketplace.redeemed_codes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn coupon_redemption_failure_is_best_effort() {
    let marketplace = MockMarketplace {
        fail_coupon_apply: true,
        ..MockMarketplace::with_standard_catalog()
    };
    let mut cart = open_cart();
    cart.add_item(snapshot("p-desk", 2000, 10), 1).unwrap();

    let mut coupons = CouponSession::new();
    coupons
        .apply(
            &marketplace,
            CouponCode::parse("SAVE10").unwrap(),
            cart.lines(),
        )
        .await
        .unwrap();

    // Order creation succeeded, so checkout succeeds even though the
    // redemption call failed
    let order = checkout::place_order(&mut cart, &mut coupons, checkout_form(), &marketplace)
        .await
        .unwrap();

    assert_eq!(marketplace.orders_accepted(), 1);
    assert!(cart.is_empty());
    assert_eq!(order.coupon_discount, Some(Price::from_major(10)));
}

#[tokio::test]
async fn empty_cart_never_reaches_the_gateway() {
    let marketplace = MockMarketplace::with_standard_catalog();
    let mut cart = open_cart();
    let mut coupons = CouponSession::new();

    let err = checkout::place_order(&mut cart, &mut coupons, checkout_form(), &marketplace)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(marketplace.orders_accepted(), 0);
}

#[tokio::test]
async fn refresh_before_checkout_reconciles_stale_snapshots() {
    // The cart was filled when the desk organizer cost $20.00 with stock 10;
    // since then the price rose and stock fell
    let mut marketplace = MockMarketplace::with_standard_catalog();
    marketplace.products[0] = bazaar_integration_tests::product(
        "p-desk",
        "Walnut Desk Organizer",
        2500,
        2,
    );

    let mut cart = open_cart();
    cart.add_item(snapshot("p-desk", 2000, 10), 5).unwrap();

    checkout::refresh_cart(&mut cart, &marketplace).await.unwrap();

    assert_eq!(cart.lines()[0].product.price, Price::from_cents(2500));
    assert_eq!(cart.lines()[0].quantity, 2);

    let mut coupons = CouponSession::new();
    let order = checkout::place_order(&mut cart, &mut coupons, checkout_form(), &marketplace)
        .await
        .unwrap();

    // 2 x 25.00 = 50.00 subtotal: at the threshold, so shipping still applies
    assert_eq!(order.items_price, Price::from_major(50));
    assert_eq!(order.shipping_price, Price::from_major(10));
}

#[tokio::test]
async fn refresh_drops_products_gone_from_catalog() {
    let marketplace = MockMarketplace::with_standard_catalog();
    let mut cart = open_cart();
    cart.add_item(snapshot("p-desk", 2000, 10), 1).unwrap();
    cart.add_item(snapshot("p-retired", 999, 10), 1).unwrap();

    checkout::refresh_cart(&mut cart, &marketplace).await.unwrap();

    let ids: Vec<&str> = cart.lines().iter().map(|l| l.product.id.as_str()).collect();
    assert_eq!(ids, vec!["p-desk"]);
}

#[tokio::test]
async fn unknown_coupon_is_rejected_with_server_message() {
    let marketplace = MockMarketplace::with_standard_catalog();
    let mut cart = open_cart();
    cart.add_item(snapshot("p-desk", 2000, 10), 1).unwrap();

    let mut coupons = CouponSession::new();
    let err = coupons
        .apply(
            &marketplace,
            CouponCode::parse("BOGUS").unwrap(),
            cart.lines(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Api { status: 400, .. }));
    assert_eq!(err.to_string(), "Invalid coupon code");

    // Cart state is untouched by a rejected coupon
    assert_eq!(cart.count(), 1);
    assert!(coupons.applied().is_none());

    // The cart can still check out at full price
    let order = checkout::place_order(&mut cart, &mut coupons, checkout_form(), &marketplace)
        .await
        .unwrap();
    assert!(order.coupon_code.is_none());
}

#[tokio::test]
async fn product_id_lookup_roundtrip() {
    use bazaar_storefront::api::ProductCatalog;

    let marketplace = MockMarketplace::with_standard_catalog();
    let found = marketplace.product(&ProductId::new("p-desk")).await.unwrap();
    assert_eq!(found.name, "Walnut Desk Organizer");

    let missing = marketplace.product(&ProductId::new("nope")).await;
    assert!(matches!(missing, Err(ApiError::NotFound(_))));
}
