//! Quantity validation against stock.
//!
//! The per-line maximum is `min(stock, cap)`: the cap bounds UI quantity
//! steppers regardless of how much stock exists. The default cap of 10 is
//! a store policy knob, not a fixed rule, so it is configurable.

use crate::error::CartError;

/// Default per-line quantity cap.
pub const DEFAULT_LINE_CAP: u32 = 10;

/// Decides whether a requested quantity is allowed for a resolved selection.
#[derive(Debug, Clone, Copy)]
pub struct StockGuard {
    cap: u32,
}

impl Default for StockGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl StockGuard {
    /// Guard with the default per-line cap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cap: DEFAULT_LINE_CAP,
        }
    }

    /// Guard with a custom per-line cap.
    #[must_use]
    pub const fn with_cap(cap: u32) -> Self {
        Self { cap }
    }

    /// Maximum quantity allowed for a line with the given stock.
    #[must_use]
    pub fn max_allowed(&self, stock: u32) -> u32 {
        stock.min(self.cap)
    }

    /// Validate a requested quantity against the resolved stock.
    ///
    /// # Errors
    ///
    /// Returns `StockExceeded` carrying the actual remaining stock when the
    /// request is above `min(stock, cap)`; the caller leaves the quantity
    /// unchanged.
    pub fn check(&self, stock: u32, requested: u32) -> Result<(), CartError> {
        if requested > self.max_allowed(stock) {
            return Err(CartError::StockExceeded { remaining: stock });
        }
        Ok(())
    }

    /// Classify a requested quantity: anything below 1 is a removal
    /// request, never a line with quantity zero.
    #[must_use]
    pub const fn classify(requested: u32) -> QuantityChange {
        match requested {
            0 => QuantityChange::Remove,
            n => QuantityChange::Set(n),
        }
    }
}

/// Outcome of classifying a requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// Remove the line from the cart.
    Remove,
    /// Set the line to this quantity (>= 1).
    Set(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_bounds_plentiful_stock() {
        let guard = StockGuard::new();
        assert_eq!(guard.max_allowed(500), 10);
        assert!(guard.check(500, 10).is_ok());
        assert!(matches!(
            guard.check(500, 11),
            Err(CartError::StockExceeded { remaining: 500 })
        ));
    }

    #[test]
    fn test_scarce_stock_bounds_below_cap() {
        let guard = StockGuard::new();
        assert_eq!(guard.max_allowed(3), 3);
        assert!(guard.check(3, 3).is_ok());
        assert!(matches!(
            guard.check(3, 4),
            Err(CartError::StockExceeded { remaining: 3 })
        ));
    }

    #[test]
    fn test_zero_stock_allows_nothing() {
        let guard = StockGuard::new();
        assert!(matches!(
            guard.check(0, 1),
            Err(CartError::StockExceeded { remaining: 0 })
        ));
    }

    #[test]
    fn test_custom_cap() {
        let guard = StockGuard::with_cap(5);
        assert_eq!(guard.max_allowed(100), 5);
        assert!(guard.check(100, 5).is_ok());
        assert!(guard.check(100, 6).is_err());
    }

    #[test]
    fn test_below_one_is_removal() {
        assert_eq!(StockGuard::classify(0), QuantityChange::Remove);
        assert_eq!(StockGuard::classify(1), QuantityChange::Set(1));
        assert_eq!(StockGuard::classify(7), QuantityChange::Set(7));
    }
}
