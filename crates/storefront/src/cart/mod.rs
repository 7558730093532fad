//! Session cart.
//!
//! A cart is a list of [`CartLine`]s keyed by (product, variant, size).
//! At most one line exists per key: adding the same combination again
//! increments the quantity instead of duplicating the line. The
//! [`model::CartModel`] mediates every mutation through the remote cart
//! API; [`stock::StockGuard`] bounds quantities and [`pricing`] derives
//! the totals views render.

pub mod model;
pub mod pricing;
pub mod stock;

use serde::{Deserialize, Serialize};
use tradewind_core::{Price, ProductId, Size, VariantId};

pub use model::{CartBackend, CartModel};
pub use pricing::PricingSummary;
pub use stock::{QuantityChange, StockGuard};

/// Identity of a cart line: one line per unique key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    /// Product the line belongs to.
    pub product_id: ProductId,
    /// Specific variant of the product.
    pub variant_id: VariantId,
    /// Selected size, for fashion products.
    pub size: Option<Size>,
}

/// A line item in the session cart.
///
/// Prices and stock are snapshots taken when the line was added or last
/// reconciled with the server; the server stays authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Line identity.
    pub key: LineKey,
    /// Product name snapshot for display.
    pub name: String,
    /// Variant color.
    pub color: String,
    /// Variant RAM label (electronics).
    pub ram: Option<String>,
    /// Variant ROM label (electronics).
    pub rom: Option<String>,
    /// Primary image URL, if any.
    pub image: Option<String>,
    /// List price snapshot.
    pub price: Price,
    /// Offer price snapshot, never above `price`.
    pub offer_price: Option<Price>,
    /// Units of this line in the cart; at least 1.
    pub quantity: u32,
    /// Stock available for this exact selection at snapshot time.
    pub available_stock: u32,
}

impl CartLine {
    /// The per-unit price the buyer pays.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.offer_price.unwrap_or(self.price)
    }
}
