//! Product catalog domain.
//!
//! Types mirror what the remote store API serves; they are read-only from
//! the client's perspective. The [`variant`] module maps a shopper's
//! partial or full selection onto a concrete variant and its stock.

pub mod types;
pub mod variant;

pub use types::{Inventory, Product, ProductRating, SizeStock, Variant};
pub use variant::{ResolvedVariant, VariantResolver, VariantSelection};
