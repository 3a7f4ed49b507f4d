//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use bazaar_storefront::StorefrontError;
use bazaar_storefront::api::MarketplaceClient;
use bazaar_storefront::cart::{CartStore, JsonFileCartRepository};
use bazaar_storefront::config::StorefrontConfig;

/// Load configuration and build the API client.
pub(crate) fn client() -> Result<(StorefrontConfig, MarketplaceClient), StorefrontError> {
    let config = StorefrontConfig::from_env()?;
    let client = MarketplaceClient::new(&config)?;
    Ok((config, client))
}

/// Open the persisted cart selected by the configuration.
pub(crate) fn open_cart(config: &StorefrontConfig) -> Result<CartStore, StorefrontError> {
    let repository = JsonFileCartRepository::new(config.storage_dir.clone());
    Ok(CartStore::open(config.cart_owner(), Box::new(repository))?)
}
