//! Variant resolution.
//!
//! Maps a shopper's selection onto a concrete [`Variant`] (or reports that
//! no such combination exists), and narrows the remaining options for
//! cascading dropdowns: picking a color narrows the available RAM values,
//! picking RAM narrows the available ROM values.
//!
//! There is never an implicit fallback: a (ram, rom) pair that does not
//! exist for the chosen color resolves to `VariantNotFound` so the caller
//! can render the option as disabled, rather than silently substituting a
//! different variant.

use tradewind_core::Size;

use crate::catalog::types::{Inventory, Product, Variant};
use crate::error::CartError;

/// A shopper's variant selection, tagged by selection strategy.
///
/// Electronics resolve by the full (color, ram, rom) combination; fashion
/// resolves the variant by color, with the size picking a stock entry
/// inside that variant. Fields are optional so a partially-built selection
/// can drive option narrowing before it is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantSelection {
    Electronics {
        color: Option<String>,
        ram: Option<String>,
        rom: Option<String>,
    },
    Fashion {
        color: Option<String>,
        size: Option<Size>,
    },
}

impl VariantSelection {
    /// Convenience constructor for a complete electronics selection.
    #[must_use]
    pub fn electronics(
        color: impl Into<String>,
        ram: impl Into<String>,
        rom: impl Into<String>,
    ) -> Self {
        Self::Electronics {
            color: Some(color.into()),
            ram: Some(ram.into()),
            rom: Some(rom.into()),
        }
    }

    /// Convenience constructor for a complete fashion selection.
    #[must_use]
    pub fn fashion(color: impl Into<String>, size: Size) -> Self {
        Self::Fashion {
            color: Some(color.into()),
            size: Some(size),
        }
    }
}

/// A selection resolved against a product's variants.
#[derive(Debug, Clone)]
pub struct ResolvedVariant<'a> {
    /// The matched variant.
    pub variant: &'a Variant,
    /// The size requested by the selection, for fashion products.
    requested_size: Option<Size>,
}

impl<'a> ResolvedVariant<'a> {
    /// Stock available for the exact selection.
    ///
    /// # Errors
    ///
    /// Returns `SelectionIncomplete` when the variant tracks per-size stock
    /// but no size was selected. A selected size the variant does not stock
    /// counts as zero.
    pub fn available_stock(&self) -> Result<u32, CartError> {
        match &self.variant.inventory {
            Inventory::Flat(count) => Ok(*count),
            Inventory::Sized(_) => {
                let size = self
                    .requested_size
                    .as_ref()
                    .ok_or(CartError::SelectionIncomplete { missing: "size" })?;
                Ok(self.variant.stock_for(size).unwrap_or(0))
            }
        }
    }

    /// The size this resolution was made for, if any.
    #[must_use]
    pub const fn size(&self) -> Option<&Size> {
        self.requested_size.as_ref()
    }
}

/// Resolves selections against one product's variant matrix.
#[derive(Debug, Clone, Copy)]
pub struct VariantResolver<'a> {
    product: &'a Product,
}

impl<'a> VariantResolver<'a> {
    /// Create a resolver for a product.
    #[must_use]
    pub const fn new(product: &'a Product) -> Self {
        Self { product }
    }

    /// Resolve a fully-specified selection to exactly one variant.
    ///
    /// # Errors
    ///
    /// - `SelectionIncomplete` when a dimension required to identify the
    ///   variant is missing (color for both strategies, ram/rom for
    ///   electronics).
    /// - `VariantNotFound` when no variant matches the combination, or the
    ///   selection strategy does not fit the product's category.
    pub fn resolve(&self, selection: &VariantSelection) -> Result<ResolvedVariant<'a>, CartError> {
        match selection {
            VariantSelection::Electronics { color, ram, rom } => {
                if self.product.category.is_fashion() {
                    return Err(CartError::VariantNotFound);
                }
                let color = require(color.as_deref(), "color")?;
                let ram = require(ram.as_deref(), "ram")?;
                let rom = require(rom.as_deref(), "rom")?;

                self.product
                    .variants
                    .iter()
                    .find(|v| {
                        v.color == color
                            && v.ram.as_deref() == Some(ram)
                            && v.rom.as_deref() == Some(rom)
                    })
                    .map(|variant| ResolvedVariant {
                        variant,
                        requested_size: None,
                    })
                    .ok_or(CartError::VariantNotFound)
            }
            VariantSelection::Fashion { color, size } => {
                if !self.product.category.is_fashion() {
                    return Err(CartError::VariantNotFound);
                }
                let color = require(color.as_deref(), "color")?;

                self.product
                    .variants
                    .iter()
                    .find(|v| v.color == color)
                    .map(|variant| ResolvedVariant {
                        variant,
                        requested_size: size.clone(),
                    })
                    .ok_or(CartError::VariantNotFound)
            }
        }
    }

    /// All colors, in first-seen variant order.
    #[must_use]
    pub fn colors(&self) -> Vec<&'a str> {
        let mut seen = Vec::new();
        for variant in &self.product.variants {
            if !seen.contains(&variant.color.as_str()) {
                seen.push(variant.color.as_str());
            }
        }
        seen
    }

    /// RAM values available for a color, in first-seen order.
    #[must_use]
    pub fn rams_for(&self, color: &str) -> Vec<&'a str> {
        let mut seen = Vec::new();
        for variant in &self.product.variants {
            if variant.color == color
                && let Some(ram) = variant.ram.as_deref()
                && !seen.contains(&ram)
            {
                seen.push(ram);
            }
        }
        seen
    }

    /// ROM values available for a (color, ram) pair, in first-seen order.
    #[must_use]
    pub fn roms_for(&self, color: &str, ram: &str) -> Vec<&'a str> {
        let mut seen = Vec::new();
        for variant in &self.product.variants {
            if variant.color == color
                && variant.ram.as_deref() == Some(ram)
                && let Some(rom) = variant.rom.as_deref()
                && !seen.contains(&rom)
            {
                seen.push(rom);
            }
        }
        seen
    }

    /// Sizes stocked for a fashion color, in the variant's declared order.
    ///
    /// Includes zero-stock sizes so the caller can render them disabled.
    #[must_use]
    pub fn sizes_for(&self, color: &str) -> Vec<&'a Size> {
        self.product
            .variants
            .iter()
            .filter(|v| v.color == color)
            .flat_map(|v| match &v.inventory {
                Inventory::Sized(sizes) => sizes.as_slice(),
                Inventory::Flat(_) => &[],
            })
            .map(|s| &s.size)
            .collect()
    }
}

fn require<'a>(value: Option<&'a str>, missing: &'static str) -> Result<&'a str, CartError> {
    value.ok_or(CartError::SelectionIncomplete { missing })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::types::tests::{electronics_variant, fashion_variant};
    use crate::catalog::types::{ProductRating, SizeStock};
    use tradewind_core::{Category, ProductId};

    fn phone_x() -> Product {
        Product {
            id: ProductId::new("phone-x"),
            name: "Phone-X".to_owned(),
            category: Category::Phone,
            brand: "Acme".to_owned(),
            description: String::new(),
            variants: vec![
                electronics_variant("v1", "Black", "4GB", "64GB", 2),
                electronics_variant("v2", "Black", "8GB", "128GB", 0),
                electronics_variant("v3", "Silver", "8GB", "256GB", 5),
            ],
            rating: Some(ProductRating {
                value: 4.2,
                count: 37,
            }),
        }
    }

    fn hoodie() -> Product {
        Product {
            id: ProductId::new("hoodie"),
            name: "Hoodie".to_owned(),
            category: Category::Clothing,
            brand: "Acme".to_owned(),
            description: String::new(),
            variants: vec![
                fashion_variant(
                    "v1",
                    "Red",
                    vec![
                        SizeStock {
                            size: Size::M,
                            stock: 1,
                        },
                        SizeStock {
                            size: Size::L,
                            stock: 0,
                        },
                    ],
                ),
                fashion_variant(
                    "v2",
                    "Blue",
                    vec![SizeStock {
                        size: Size::S,
                        stock: 4,
                    }],
                ),
            ],
            rating: None,
        }
    }

    #[test]
    fn test_full_electronics_selection_resolves_single_variant() {
        let product = phone_x();
        let resolver = VariantResolver::new(&product);
        let selection = VariantSelection::electronics("Black", "8GB", "128GB");

        let resolved = resolver.resolve(&selection).unwrap();
        assert_eq!(resolved.variant.variant_id.as_str(), "v2");
        // Out of stock must still resolve, reporting zero availability.
        assert_eq!(resolved.available_stock().unwrap(), 0);
    }

    #[test]
    fn test_nonexistent_combination_is_not_substituted() {
        let product = phone_x();
        let resolver = VariantResolver::new(&product);
        // 4GB/128GB exists for neither color.
        let selection = VariantSelection::electronics("Black", "4GB", "128GB");

        assert!(matches!(
            resolver.resolve(&selection),
            Err(CartError::VariantNotFound)
        ));
    }

    #[test]
    fn test_partial_electronics_selection_is_incomplete() {
        let product = phone_x();
        let resolver = VariantResolver::new(&product);
        let selection = VariantSelection::Electronics {
            color: Some("Black".to_owned()),
            ram: None,
            rom: None,
        };

        assert!(matches!(
            resolver.resolve(&selection),
            Err(CartError::SelectionIncomplete { missing: "ram" })
        ));
    }

    #[test]
    fn test_option_narrowing_cascade() {
        let product = phone_x();
        let resolver = VariantResolver::new(&product);

        assert_eq!(resolver.colors(), vec!["Black", "Silver"]);
        assert_eq!(resolver.rams_for("Black"), vec!["4GB", "8GB"]);
        assert_eq!(resolver.roms_for("Black", "8GB"), vec!["128GB"]);
        assert!(resolver.roms_for("Silver", "4GB").is_empty());
    }

    #[test]
    fn test_fashion_resolves_variant_by_color_and_size_within_it() {
        let product = hoodie();
        let resolver = VariantResolver::new(&product);
        let selection = VariantSelection::fashion("Red", Size::M);

        let resolved = resolver.resolve(&selection).unwrap();
        assert_eq!(resolved.variant.variant_id.as_str(), "v1");
        assert_eq!(resolved.available_stock().unwrap(), 1);
    }

    #[test]
    fn test_fashion_without_size_fails_before_stock_lookup() {
        let product = hoodie();
        let resolver = VariantResolver::new(&product);
        let selection = VariantSelection::Fashion {
            color: Some("Red".to_owned()),
            size: None,
        };

        let resolved = resolver.resolve(&selection).unwrap();
        assert!(matches!(
            resolved.available_stock(),
            Err(CartError::SelectionIncomplete { missing: "size" })
        ));
    }

    #[test]
    fn test_fashion_unstocked_size_counts_as_zero() {
        let product = hoodie();
        let resolver = VariantResolver::new(&product);
        let selection = VariantSelection::fashion("Red", Size::Xxl);

        let resolved = resolver.resolve(&selection).unwrap();
        assert_eq!(resolved.available_stock().unwrap(), 0);
    }

    #[test]
    fn test_sizes_for_color_includes_zero_stock() {
        let product = hoodie();
        let resolver = VariantResolver::new(&product);
        assert_eq!(resolver.sizes_for("Red"), vec![&Size::M, &Size::L]);
    }

    #[test]
    fn test_strategy_mismatch_is_not_found() {
        let product = hoodie();
        let resolver = VariantResolver::new(&product);
        let selection = VariantSelection::electronics("Red", "8GB", "128GB");

        assert!(matches!(
            resolver.resolve(&selection),
            Err(CartError::VariantNotFound)
        ));
    }
}
