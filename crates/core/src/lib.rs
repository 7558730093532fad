//! Tradewind Core - Shared types library.
//!
//! This crate provides common types used across all Tradewind components:
//! - `storefront` - Client-side storefront core (catalog, cart, pricing)
//! - `integration-tests` - Scenario tests against a mock backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, categories, and sizes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
