//! Unified error type for the storefront engine.
//!
//! Each boundary owns its error enum ([`ApiError`], [`StorageError`],
//! [`CheckoutError`], [`ConfigError`]); this umbrella exists for callers -
//! like the terminal client - that drive several boundaries in one flow and
//! want a single `Result` type.

use thiserror::Error;

use crate::api::ApiError;
use crate::cart::StorageError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

/// Top-level error for storefront engine operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A marketplace API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading or writing persisted cart state failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Checkout submission failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
