//! Core types for Tradewind.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod size;

pub use category::Category;
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use size::{Size, SizeParseError};
