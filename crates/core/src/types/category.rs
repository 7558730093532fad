//! Product category enumeration.
//!
//! The category decides how a product's variants are selected: fashion
//! products (clothing, shoes) pick a color and then a size within it, while
//! electronics pick a full (color, ram, rom) combination.

use serde::{Deserialize, Serialize};

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothing,
    Shoes,
    Phone,
    Laptop,
    Tablet,
    Smartwatch,
    Other,
}

impl Category {
    /// Whether variants of this category carry size-level stock.
    #[must_use]
    pub const fn is_fashion(&self) -> bool {
        matches!(self, Self::Clothing | Self::Shoes)
    }

    /// Lowercase label as used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clothing => "clothing",
            Self::Shoes => "shoes",
            Self::Phone => "phone",
            Self::Laptop => "laptop",
            Self::Tablet => "tablet",
            Self::Smartwatch => "smartwatch",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
