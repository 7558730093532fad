//! Tradewind Storefront - client-side storefront core.
//!
//! This crate is the presentation-layer core of an e-commerce storefront:
//! it keeps the session cart, resolves variant selections against a
//! product's variant matrix, validates quantities against stock, and
//! derives the pricing summary views render from. All durable state lives
//! behind the remote store API; this crate only caches what the session
//! needs.
//!
//! # Architecture
//!
//! - [`catalog`] - Product/variant domain types and the variant resolver
//! - [`cart`] - Cart model, stock guard, and pricing summary
//! - [`api`] - REST client for the remote store API
//! - [`session`] - Explicit session context (no ambient global state)
//!
//! # Example
//!
//! ```rust,ignore
//! use tradewind_storefront::api::StoreClient;
//! use tradewind_storefront::cart::CartModel;
//! use tradewind_storefront::catalog::VariantSelection;
//! use tradewind_storefront::config::StoreConfig;
//! use tradewind_storefront::session::SessionContext;
//!
//! let config = StoreConfig::from_env()?;
//! let client = StoreClient::new(&config);
//! let session = SessionContext::for_user("user-1".into());
//! let cart = CartModel::new(client.clone(), session, config.stock_guard());
//!
//! let product = client.get_product(&"phone-x".into()).await?;
//! let selection = VariantSelection::electronics("Black", "8GB", "128GB");
//! cart.add(&product, &selection, 1).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod session;

pub use error::CartError;
