//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `storefront` - Cart, pricing, and checkout engine
//! - `cli` - Terminal client driving the engine
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, coupon codes,
//!   product snapshots, and order data

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
