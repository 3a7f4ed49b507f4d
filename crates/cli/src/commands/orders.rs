//! Order tracking commands.

use bazaar_core::{Order, OrderId};
use bazaar_storefront::StorefrontError;

/// List the authenticated user's orders.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), StorefrontError> {
    let (_config, client) = super::client()?;

    let orders = client.orders().await?;

    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }

    for order in &orders {
        println!(
            "{:<14} {:<12} {:>10}  {} items  placed {}",
            order.id.to_string(),
            format!("{:?}", order.order_status).to_lowercase(),
            order.total_price.to_string(),
            order.items.len(),
            order.created_at.format("%Y-%m-%d"),
        );
    }

    Ok(())
}

/// Show one order in detail.
#[allow(clippy::print_stdout)]
pub async fn show(id: &str) -> Result<(), StorefrontError> {
    let (_config, client) = super::client()?;

    let order = client.order(&OrderId::new(id)).await?;
    print_order(&order);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_order(order: &Order) {
    println!("Order {}", order.id);
    println!(
        "  Placed:   {}",
        order.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("  Status:   {:?}", order.order_status);
    println!(
        "  Payment:  {} ({:?})",
        order.payment_method, order.payment_status
    );
    println!();

    for item in &order.items {
        println!(
            "  {:<40} {:>3} x {:>10} = {:>10}",
            item.name,
            item.quantity,
            item.price.to_string(),
            (item.price * item.quantity).to_string(),
        );
    }

    println!();
    println!("  Items:    {:>10}", order.items_price.to_string());
    println!("  Shipping: {:>10}", order.shipping_price.to_string());
    println!("  Tax:      {:>10}", order.tax_price.to_string());
    if let Some(discount) = order.coupon_discount {
        let code = order
            .coupon_code
            .as_ref()
            .map_or_else(String::new, ToString::to_string);
        println!("  Coupon:  -{:>10} ({code})", discount.to_string());
    }
    println!("  Total:    {:>10}", order.total_price.to_string());
    println!();
    println!("  Ship to:  {}", order.shipping_address.street);
    println!(
        "            {}, {} {}",
        order.shipping_address.city, order.shipping_address.state, order.shipping_address.zip_code
    );
    println!("            {}", order.shipping_address.country);
}
