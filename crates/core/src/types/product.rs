//! Catalog product and the immutable snapshot captured into cart lines.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, VendorId};
use super::price::Price;

/// A product as served by the marketplace catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned product ID.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Product display name.
    pub name: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Current unit price.
    pub price: Price,
    /// Units currently available.
    pub stock: u32,
    /// Image URLs, first is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    /// Category name used for browsing filters.
    #[serde(default)]
    pub category: String,
    /// The vendor selling this product.
    pub vendor: VendorId,
    /// Whether the product is featured on the home page.
    #[serde(default)]
    pub featured: bool,
    /// Average review rating, absent when unreviewed.
    #[serde(default)]
    pub average_rating: Option<f64>,
}

impl Product {
    /// Capture the fields a cart line needs, frozen at add time.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            stock: self.stock,
            image: self.images.first().cloned(),
            vendor: self.vendor.clone(),
        }
    }
}

/// The product data a cart line carries.
///
/// Captured when the item is added and deliberately NOT refreshed on read:
/// the price a shopper saw when adding stays the price shown in the cart.
/// Snapshots are re-fetched only through an explicit refresh step before
/// checkout submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Product ID, unique per cart line.
    pub id: ProductId,
    /// Name at add time.
    pub name: String,
    /// Unit price at add time.
    pub price: Price,
    /// Available stock at add time; quantities clamp against this.
    pub stock: u32,
    /// Primary image at add time.
    pub image: Option<String>,
    /// The vendor selling this product.
    pub vendor: VendorId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: ProductId::new("p-1"),
            name: "Walnut Desk Organizer".to_string(),
            description: "Handmade organizer".to_string(),
            price: Price::from_cents(4500),
            stock: 12,
            images: vec![
                "https://cdn.example.com/p-1-front.jpg".to_string(),
                "https://cdn.example.com/p-1-side.jpg".to_string(),
            ],
            category: "Office".to_string(),
            vendor: VendorId::new("v-7"),
            featured: false,
            average_rating: Some(4.6),
        }
    }

    #[test]
    fn test_snapshot_captures_primary_image() {
        let snapshot = sample_product().snapshot();
        assert_eq!(
            snapshot.image.as_deref(),
            Some("https://cdn.example.com/p-1-front.jpg")
        );
        assert_eq!(snapshot.price, Price::from_cents(4500));
        assert_eq!(snapshot.stock, 12);
    }

    #[test]
    fn test_snapshot_of_imageless_product() {
        let mut product = sample_product();
        product.images.clear();
        assert!(product.snapshot().image.is_none());
    }

    #[test]
    fn test_product_wire_shape() {
        let json = serde_json::json!({
            "_id": "p-9",
            "name": "Ceramic Mug",
            "price": "18.00",
            "stock": 3,
            "vendor": "v-2",
            "averageRating": 4.1
        });

        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.id, ProductId::new("p-9"));
        assert_eq!(product.price, Price::from_major(18));
        assert!(product.images.is_empty());
        assert_eq!(product.average_rating, Some(4.1));
    }
}
