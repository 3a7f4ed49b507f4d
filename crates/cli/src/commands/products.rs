//! Catalog browsing commands.

use bazaar_core::ProductId;
use bazaar_storefront::StorefrontError;
use bazaar_storefront::api::ProductCatalog;
use bazaar_storefront::api::types::ProductQuery;

/// List products, optionally filtered by category or search query.
#[allow(clippy::print_stdout)]
pub async fn list(
    category: Option<String>,
    search: Option<String>,
    page: Option<u32>,
) -> Result<(), StorefrontError> {
    let (_config, client) = super::client()?;

    let query = ProductQuery {
        category,
        search,
        page,
        ..ProductQuery::default()
    };
    let response = client.products(&query).await?;

    if response.products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    for product in &response.products {
        let stock = if product.stock == 0 {
            "out of stock".to_string()
        } else {
            format!("{} in stock", product.stock)
        };
        println!(
            "{:<12} {:<40} {:>10}  {}",
            product.id.to_string(),
            product.name,
            product.price.to_string(),
            stock
        );
    }

    if response.pages > 1 {
        println!();
        println!("Page {} of {} ({} products)", response.page, response.pages, response.total);
    }

    Ok(())
}

/// Show one product in detail.
#[allow(clippy::print_stdout)]
pub async fn show(id: &str) -> Result<(), StorefrontError> {
    let (_config, client) = super::client()?;

    let product = client.product(&ProductId::new(id)).await?;

    println!("{}", product.name);
    println!("  ID:       {}", product.id);
    println!("  Price:    {}", product.price);
    println!("  Stock:    {}", product.stock);
    if !product.category.is_empty() {
        println!("  Category: {}", product.category);
    }
    if let Some(rating) = product.average_rating {
        println!("  Rating:   {rating:.1}/5");
    }
    println!("  Vendor:   {}", product.vendor);
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }

    Ok(())
}

/// List the known product categories.
#[allow(clippy::print_stdout)]
pub async fn categories() -> Result<(), StorefrontError> {
    let (_config, client) = super::client()?;

    for category in client.categories().await? {
        println!("{category}");
    }

    Ok(())
}
