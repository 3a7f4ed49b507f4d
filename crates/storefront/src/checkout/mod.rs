//! Checkout submission.
//!
//! Thin orchestration over the cart, the pricing computation, and the order
//! gateway. The one hard contract: the cart is cleared only after the
//! remote order creation succeeds - any failure leaves the cart exactly as
//! it was so the shopper can retry. Marking an applied coupon as used is a
//! separate, best-effort call fired after the order exists.

mod coupon;

pub use coupon::{CouponSession, CouponState};

use thiserror::Error;
use tracing::instrument;

use bazaar_core::{Order, OrderItem, PaymentMethod, ShippingAddress};

use crate::api::types::CreateOrderRequest;
use crate::api::{ApiError, CouponValidator, OrderGateway, ProductCatalog};
use crate::cart::{CartLine, CartStore, StorageError};
use crate::pricing;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing in the cart to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The marketplace API rejected the request or was unreachable.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Persisting the cart failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Shipping and payment details collected from the shopper.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Re-fetch every cart line's product and swap in fresh snapshots.
///
/// This is the one deliberate reconciliation point between the frozen
/// snapshots and the live catalog, run before submission rather than on
/// every display. Lines whose product disappeared or sold out are dropped;
/// remaining quantities re-clamp against current stock. The server still
/// has the final word on stock at order creation.
///
/// # Errors
///
/// Returns an error if a catalog fetch fails (other than a product having
/// been removed) or if persisting the refreshed cart fails.
#[instrument(skip(cart, catalog))]
pub async fn refresh_cart<C: ProductCatalog>(
    cart: &mut CartStore,
    catalog: &C,
) -> Result<(), CheckoutError> {
    let mut snapshots = Vec::with_capacity(cart.lines().len());

    for line in cart.lines() {
        match catalog.product(&line.product.id).await {
            Ok(product) => snapshots.push(product.snapshot()),
            Err(ApiError::NotFound(_)) => {
                tracing::info!(product = %line.product.id, "product gone from catalog, dropping line");
            }
            Err(e) => return Err(e.into()),
        }
    }

    cart.apply_refreshed_snapshots(&snapshots)?;
    Ok(())
}

/// Assemble the order draft, submit it once, and settle local state.
///
/// On success the cart is cleared, the coupon (if any) is reported as used
/// and the session reset, and the created order is returned. On failure the
/// cart and coupon session are untouched.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`] when there is nothing to order
/// - [`CheckoutError::Api`] when order creation fails; the cart survives
/// - [`CheckoutError::Storage`] when clearing the cart after a created
///   order fails
#[instrument(skip(cart, coupons, form, gateway), fields(lines = cart.lines().len()))]
pub async fn place_order<G>(
    cart: &mut CartStore,
    coupons: &mut CouponSession,
    form: CheckoutForm,
    gateway: &G,
) -> Result<Order, CheckoutError>
where
    G: OrderGateway + CouponValidator,
{
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let applied = coupons.applied().cloned();
    let breakdown = pricing::quote(cart.lines(), applied.as_ref());

    let draft = CreateOrderRequest {
        items: cart.lines().iter().map(order_item).collect(),
        shipping_address: form.shipping_address,
        payment_method: form.payment_method,
        items_price: breakdown.subtotal,
        shipping_price: breakdown.shipping,
        tax_price: breakdown.tax,
        total_price: breakdown.total,
        notes: form.notes,
        coupon_code: applied.as_ref().map(|c| c.code.clone()),
        coupon_discount: applied.as_ref().map(|c| c.discount),
    };

    let order = gateway.create_order(&draft).await?;
    tracing::info!(order = %order.id, total = %breakdown.total, "order created");

    cart.clear()?;

    // Coupon redemption is best-effort once the order exists; the order is
    // the durable outcome and a failure here must not fail the checkout
    if let Some(coupon) = &applied {
        if let Err(e) = gateway.apply_coupon(&coupon.code).await {
            tracing::warn!(
                order = %order.id,
                code = %coupon.code,
                error = %e,
                "failed to mark coupon as used"
            );
        }
    }
    coupons.remove();

    Ok(order)
}

fn order_item(line: &CartLine) -> OrderItem {
    OrderItem {
        product: line.product.id.clone(),
        name: line.product.name.clone(),
        price: line.product.price,
        quantity: line.quantity,
        image: line.product.image.clone(),
        vendor: line.product.vendor.clone(),
    }
}
