//! Checkout command: refresh, quote, validate coupon, submit.

use clap::Args;

use bazaar_core::{CouponCode, PaymentMethod, ShippingAddress};
use bazaar_storefront::checkout::{self, CheckoutForm, CouponSession};
use bazaar_storefront::pricing;

/// Arguments for `bazaar checkout`.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Street address
    #[arg(long)]
    pub street: String,

    /// City
    #[arg(long)]
    pub city: String,

    /// State or province
    #[arg(long)]
    pub state: String,

    /// ZIP or postal code
    #[arg(long)]
    pub zip: String,

    /// Country
    #[arg(long)]
    pub country: String,

    /// Payment method: credit-card, paypal, cash-on-delivery, stripe
    #[arg(long, default_value = "credit-card")]
    pub payment: String,

    /// Optional note for the vendor
    #[arg(long)]
    pub notes: Option<String>,

    /// Coupon code to validate and apply
    #[arg(long)]
    pub coupon: Option<String>,
}

/// Run the full checkout flow for the persisted cart.
#[allow(clippy::print_stdout)]
pub async fn run(args: CheckoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (config, client) = super::client()?;
    let mut cart = super::open_cart(&config)?;

    if cart.is_empty() {
        println!("Your cart is empty; nothing to check out.");
        return Ok(());
    }

    let payment_method: PaymentMethod = args.payment.parse()?;

    // Reconcile frozen snapshots against the live catalog once, here
    checkout::refresh_cart(&mut cart, &client).await?;

    if cart.is_empty() {
        println!("Everything in your cart has sold out; nothing to check out.");
        return Ok(());
    }

    let mut coupons = CouponSession::new();
    if let Some(raw) = &args.coupon {
        let code = CouponCode::parse(raw)?;
        match coupons.apply(&client, code, cart.lines()).await {
            Ok(applied) => {
                println!("Coupon {}: {} (-{})", applied.code, applied.description, applied.discount);
            }
            Err(e) => {
                // A bad coupon stops checkout rather than silently charging
                // full price
                println!("Coupon rejected: {e}");
                return Ok(());
            }
        }
    }

    let breakdown = pricing::quote(cart.lines(), coupons.applied());
    println!();
    println!("  Subtotal:        {:>10}", breakdown.subtotal.to_string());
    if breakdown.free_shipping() {
        println!("  Shipping:              FREE");
    } else {
        println!("  Shipping:        {:>10}", breakdown.shipping.to_string());
    }
    println!("  Tax (10%):       {:>10}", breakdown.tax.to_string());
    if !breakdown.coupon_discount.is_zero() {
        println!("  Coupon:         -{:>10}", breakdown.coupon_discount.to_string());
    }
    println!("  Total:           {:>10}", breakdown.total.to_string());
    println!();

    let form = CheckoutForm {
        shipping_address: ShippingAddress {
            street: args.street,
            city: args.city,
            state: args.state,
            zip_code: args.zip,
            country: args.country,
        },
        payment_method,
        notes: args.notes,
    };

    let order = checkout::place_order(&mut cart, &mut coupons, form, &client).await?;

    println!("Order {} placed - total {}.", order.id, order.total_price);
    println!("Track it with: bazaar orders show {}", order.id);

    Ok(())
}
