//! Pure pricing computation for cart display and order submission.
//!
//! [`quote`] derives every monetary figure shown to the shopper from a cart
//! snapshot and the optionally applied coupon. It is deterministic and free
//! of side effects: same input, same breakdown, no network, no hidden
//! state. All arithmetic stays at full decimal precision; two-decimal
//! rounding happens only when a figure is displayed or serialized.

use rust_decimal::Decimal;
use serde::Serialize;

use bazaar_core::{AppliedCoupon, Price};

use crate::cart::CartLine;

/// Orders with a subtotal strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::new(Decimal::from_parts(50, 0, 0, false, 0));

/// Flat shipping charge below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Price = Price::new(Decimal::from_parts(10, 0, 0, false, 0));

/// Sales tax rate applied to the subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Every monetary figure for one (cart, coupon) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    /// Sum of line totals.
    pub subtotal: Price,
    /// Flat fee, or zero above the free-shipping threshold.
    pub shipping: Price,
    /// Tax on the subtotal.
    pub tax: Price,
    /// Fixed discount from the applied coupon, zero without one.
    pub coupon_discount: Price,
    /// What the shopper pays: subtotal + shipping + tax - discount.
    pub total: Price,
}

impl PriceBreakdown {
    /// Whether the order qualified for free shipping.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Compute the full price breakdown for the given cart lines and coupon.
///
/// Steps, in order: subtotal, shipping (free strictly above
/// [`FREE_SHIPPING_THRESHOLD`]), tax, coupon discount, total. The server
/// computed the coupon's discount against this same cart; it is taken
/// verbatim here. The total is floored at zero: a discount larger than the
/// whole charge cannot produce a negative order total.
#[must_use]
pub fn quote(lines: &[CartLine], coupon: Option<&AppliedCoupon>) -> PriceBreakdown {
    let subtotal: Price = lines.iter().map(CartLine::line_total).sum();

    let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
        Price::ZERO
    } else {
        FLAT_SHIPPING_FEE
    };

    let tax = Price::new(subtotal.amount() * TAX_RATE);
    let coupon_discount = coupon.map_or(Price::ZERO, |c| c.discount);

    let total = (subtotal + shipping + tax).saturating_sub(coupon_discount);

    PriceBreakdown {
        subtotal,
        shipping,
        tax,
        coupon_discount,
        total,
    }
}
