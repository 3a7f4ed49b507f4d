//! Cart management commands.
//!
//! The cart persists between invocations, so `bazaar cart add` followed by
//! `bazaar cart show` in a new process sees the same lines.

use bazaar_core::ProductId;
use bazaar_storefront::StorefrontError;
use bazaar_storefront::api::ProductCatalog;
use bazaar_storefront::cart::CartStore;
use bazaar_storefront::pricing;

/// Print the cart lines and price breakdown.
#[allow(clippy::print_stdout)]
pub fn show() -> Result<(), StorefrontError> {
    let config = bazaar_storefront::config::StorefrontConfig::from_env()?;
    let cart = super::open_cart(&config)?;

    print_cart(&cart);
    Ok(())
}

/// Fetch a product and add it to the cart.
///
/// The product data is captured as a snapshot at this moment; the price
/// shown in the cart stays fixed until checkout refreshes it.
#[allow(clippy::print_stdout)]
pub async fn add(id: &str, quantity: u32) -> Result<(), StorefrontError> {
    let (config, client) = super::client()?;
    let mut cart = super::open_cart(&config)?;

    let product = client.product(&ProductId::new(id)).await?;

    if product.stock == 0 {
        println!("{} is out of stock.", product.name);
        return Ok(());
    }

    cart.add_item(product.snapshot(), quantity)?;
    println!("Added {} x {} ({} items in cart)", quantity, product.name, cart.count());
    Ok(())
}

/// Remove a product from the cart.
#[allow(clippy::print_stdout)]
pub fn remove(id: &str) -> Result<(), StorefrontError> {
    let config = bazaar_storefront::config::StorefrontConfig::from_env()?;
    let mut cart = super::open_cart(&config)?;

    cart.remove_item(&ProductId::new(id))?;
    println!("Removed {id} ({} items in cart)", cart.count());
    Ok(())
}

/// Set the quantity for a product; 0 removes it.
#[allow(clippy::print_stdout)]
pub fn set(id: &str, quantity: u32) -> Result<(), StorefrontError> {
    let config = bazaar_storefront::config::StorefrontConfig::from_env()?;
    let mut cart = super::open_cart(&config)?;

    cart.update_quantity(&ProductId::new(id), quantity)?;
    println!("Cart updated ({} items)", cart.count());
    Ok(())
}

/// Empty the cart.
#[allow(clippy::print_stdout)]
pub fn clear() -> Result<(), StorefrontError> {
    let config = bazaar_storefront::config::StorefrontConfig::from_env()?;
    let mut cart = super::open_cart(&config)?;

    cart.clear()?;
    println!("Cart cleared.");
    Ok(())
}

/// Sign out: the persisted cart for the current owner is cleared.
#[allow(clippy::print_stdout)]
pub fn logout() -> Result<(), StorefrontError> {
    let config = bazaar_storefront::config::StorefrontConfig::from_env()?;
    let mut cart = super::open_cart(&config)?;

    cart.clear()?;
    println!("Signed out; local cart cleared.");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub(crate) fn print_cart(cart: &CartStore) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for line in cart.lines() {
        println!(
            "{:<12} {:<40} {:>3} x {:>10} = {:>10}",
            line.product.id.to_string(),
            line.product.name,
            line.quantity,
            line.product.price.to_string(),
            line.line_total().to_string(),
        );
    }

    let breakdown = pricing::quote(cart.lines(), None);
    println!();
    println!("  Subtotal ({} items): {:>10}", cart.count(), breakdown.subtotal.to_string());
    if breakdown.free_shipping() {
        println!("  Shipping:                  FREE");
    } else {
        println!("  Shipping:            {:>10}", breakdown.shipping.to_string());
    }
    println!("  Tax (10%):           {:>10}", breakdown.tax.to_string());
    println!("  Total:               {:>10}", breakdown.total.to_string());
}
