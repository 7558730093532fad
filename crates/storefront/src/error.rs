//! Cart-facing error taxonomy.
//!
//! Local validation errors (`SelectionIncomplete`, `StockExceeded`,
//! `VariantNotFound`) are resolved synchronously and block a mutation
//! before any network request is issued. `Network` is only possible after
//! a request went out, and is always recoverable: the cart rolls back to
//! its last known-good state.

use thiserror::Error;

use crate::api::ApiError;

/// Errors surfaced by cart operations to the calling UI layer.
///
/// Nothing here is fatal; every variant is reported for display and the
/// cart state stays consistent.
#[derive(Debug, Error)]
pub enum CartError {
    /// No logged-in user in the session context.
    #[error("not signed in")]
    NotAuthenticated,

    /// A required variant dimension has not been selected.
    #[error("selection incomplete: choose a {missing}")]
    SelectionIncomplete {
        /// Name of the missing dimension ("color", "ram", "rom", "size").
        missing: &'static str,
    },

    /// Requested quantity exceeds the allowed maximum for the line.
    #[error("only {remaining} left in stock")]
    StockExceeded {
        /// Actual remaining stock for the resolved selection.
        remaining: u32,
    },

    /// No variant matches the requested combination.
    #[error("selected combination is unavailable")]
    VariantNotFound,

    /// Transport or server failure; carries the server message verbatim
    /// when one was returned.
    #[error("{0}")]
    Network(#[from] ApiError),
}

/// Result type alias for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;
