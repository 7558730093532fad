//! Domain types for the store catalog.
//!
//! These types provide a clean, ergonomic API over the remote store's wire
//! format. A product owns an ordered sequence of variants; each variant is
//! uniquely identified within its product by (color, ram, rom) for
//! electronics or by color alone for fashion, where stock is tracked per
//! size inside the variant.

use serde::{Deserialize, Serialize};
use tradewind_core::{Category, Price, ProductId, Size, VariantId};

/// A product in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Category, which drives the variant selection strategy.
    pub category: Category,
    /// Brand name.
    pub brand: String,
    /// Plain text description.
    pub description: String,
    /// Variants in display order.
    pub variants: Vec<Variant>,
    /// Aggregate review rating, if the product has reviews.
    pub rating: Option<ProductRating>,
}

impl Product {
    /// Find a variant by its ID.
    #[must_use]
    pub fn variant(&self, variant_id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.variant_id == variant_id)
    }

    /// Whether any variant has stock left.
    #[must_use]
    pub fn available_for_sale(&self) -> bool {
        self.variants.iter().any(Variant::is_in_stock)
    }
}

/// Aggregate product rating from reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRating {
    /// Average rating value (e.g., 4.5 on a 1-5 scale).
    pub value: f64,
    /// Total number of reviews.
    pub count: i64,
}

/// A product variant (specific combination of attributes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Variant ID, unique within the product.
    pub variant_id: VariantId,
    /// Color name.
    pub color: String,
    /// RAM label (electronics only, e.g., "8GB").
    pub ram: Option<String>,
    /// ROM label (electronics only, e.g., "128GB").
    pub rom: Option<String>,
    /// Current list price.
    pub price: Price,
    /// Discounted price; never above `price`.
    pub offer_price: Option<Price>,
    /// Image URLs in display order.
    pub images: Vec<String>,
    /// Flat stock (electronics) or per-size stock (fashion).
    pub inventory: Inventory,
}

impl Variant {
    /// The price a buyer actually pays: the offer price when present,
    /// otherwise the list price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.offer_price.unwrap_or(self.price)
    }

    /// Stock for a given size, or the flat count for electronics.
    ///
    /// Returns `None` when per-size inventory exists but the size isn't
    /// stocked at all (distinct from a stocked size with count zero).
    #[must_use]
    pub fn stock_for(&self, size: &Size) -> Option<u32> {
        match &self.inventory {
            Inventory::Flat(count) => Some(*count),
            Inventory::Sized(sizes) => sizes.iter().find(|s| &s.size == size).map(|s| s.stock),
        }
    }

    /// Whether any unit of this variant can still be bought.
    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        match &self.inventory {
            Inventory::Flat(count) => *count > 0,
            Inventory::Sized(sizes) => sizes.iter().any(|s| s.stock > 0),
        }
    }
}

/// Variant inventory: either one flat count, or a count per size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inventory {
    /// Single stock count (electronics).
    Flat(u32),
    /// Stock per size (clothing/shoes); unique by size.
    Sized(Vec<SizeStock>),
}

/// Stock count for one size of a fashion variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeStock {
    /// Size label.
    pub size: Size,
    /// Units in stock for this size.
    pub stock: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal::dec;
    use tradewind_core::CurrencyCode;

    pub(crate) fn price(amount: rust_decimal::Decimal) -> Price {
        Price::new(amount, CurrencyCode::USD)
    }

    pub(crate) fn electronics_variant(
        id: &str,
        color: &str,
        ram: &str,
        rom: &str,
        stock: u32,
    ) -> Variant {
        Variant {
            variant_id: VariantId::new(id),
            color: color.to_owned(),
            ram: Some(ram.to_owned()),
            rom: Some(rom.to_owned()),
            price: price(dec!(1000)),
            offer_price: None,
            images: vec![],
            inventory: Inventory::Flat(stock),
        }
    }

    pub(crate) fn fashion_variant(id: &str, color: &str, sizes: Vec<SizeStock>) -> Variant {
        Variant {
            variant_id: VariantId::new(id),
            color: color.to_owned(),
            ram: None,
            rom: None,
            price: price(dec!(40)),
            offer_price: Some(price(dec!(30))),
            images: vec![],
            inventory: Inventory::Sized(sizes),
        }
    }

    #[test]
    fn test_effective_price_prefers_offer() {
        let variant = fashion_variant("v1", "Red", vec![]);
        assert_eq!(variant.effective_price().amount, dec!(30));

        let variant = electronics_variant("v2", "Black", "8GB", "128GB", 1);
        assert_eq!(variant.effective_price().amount, dec!(1000));
    }

    #[test]
    fn test_stock_for_flat_ignores_size_lookup_table() {
        let variant = electronics_variant("v1", "Black", "8GB", "128GB", 3);
        assert_eq!(variant.stock_for(&Size::M), Some(3));
    }

    #[test]
    fn test_stock_for_sized_distinguishes_missing_from_zero() {
        let variant = fashion_variant(
            "v1",
            "Red",
            vec![
                SizeStock {
                    size: Size::M,
                    stock: 0,
                },
                SizeStock {
                    size: Size::L,
                    stock: 2,
                },
            ],
        );
        assert_eq!(variant.stock_for(&Size::M), Some(0));
        assert_eq!(variant.stock_for(&Size::L), Some(2));
        assert_eq!(variant.stock_for(&Size::Xxl), None);
    }

    #[test]
    fn test_inventory_serde_untagged() {
        let flat: Inventory = serde_json::from_str("7").unwrap();
        assert!(matches!(flat, Inventory::Flat(7)));

        let sized: Inventory = serde_json::from_str(r#"[{"size":"M","stock":1}]"#).unwrap();
        match sized {
            Inventory::Sized(sizes) => {
                assert_eq!(sizes.len(), 1);
                assert_eq!(sizes.first().unwrap().size, Size::M);
            }
            Inventory::Flat(_) => panic!("expected sized inventory"),
        }
    }

    #[test]
    fn test_product_availability() {
        let product = Product {
            id: ProductId::new("p1"),
            name: "Tee".to_owned(),
            category: Category::Clothing,
            brand: "Acme".to_owned(),
            description: String::new(),
            variants: vec![fashion_variant(
                "v1",
                "Red",
                vec![SizeStock {
                    size: Size::M,
                    stock: 0,
                }],
            )],
            rating: None,
        };
        assert!(!product.available_for_sale());
    }
}
