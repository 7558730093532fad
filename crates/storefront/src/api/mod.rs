//! Remote store API collaborator.
//!
//! The storefront core talks to a REST API that owns all durable state:
//!
//! - `GET /{userId}/cart` - current cart lines for the session user
//! - `POST /{userId}/cart` - add a line
//! - `PUT /{userId}/cart` - change a line's quantity
//! - `DELETE /{userId}/cart` - remove a line (body disambiguates
//!   variant/size/ram/rom)
//! - `GET /products`, `GET /products/{id}` - catalog reads
//!
//! Failure responses carry a JSON `{ "message": ... }` body; that message
//! is surfaced verbatim to the caller.

mod client;

pub use client::StoreClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradewind_core::{ProductId, Size, VariantId};

/// Errors from the remote store API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status; `message` is the server's
    /// failure message, verbatim.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided message.
        message: String,
    },

    /// Response body could not be parsed.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Wire payload for cart mutations.
///
/// The same shape serves add (POST), quantity change (PUT), and removal
/// (DELETE, where `quantity` is ignored by the server).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRequest {
    /// Product being mutated.
    pub product_id: ProductId,
    /// Variant within the product.
    pub variant_id: VariantId,
    /// Selected size, for fashion products.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<Size>,
    /// Selected color.
    pub selected_color: String,
    /// Selected RAM label, for electronics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_ram: Option<String>,
    /// Selected ROM label, for electronics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_rom: Option<String>,
    /// Requested quantity.
    pub quantity: u32,
}

/// Failure envelope returned by the server.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub message: String,
}
