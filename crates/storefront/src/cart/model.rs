//! The session cart model.
//!
//! [`CartModel`] owns the session's view of the cart and mediates every
//! mutation through the remote cart API. Local validation (variant
//! resolution, stock bounds) runs before any request is issued, so invalid
//! mutations never cost a round-trip.
//!
//! # Ordering
//!
//! Mutations on a single line must apply in the order they were intended,
//! not the order responses arrive. Each mutation registers a per-line
//! intent generation; a response whose generation has been superseded is
//! discarded, so a slow earlier response never clobbers a newer one.
//! Across different lines no ordering is guaranteed or needed. Requests
//! are never aborted; staleness is detected purely on arrival.
//!
//! The state mutex is only held between awaits, never across one, and
//! reads hand out a full snapshot so a render pass never observes a torn
//! cart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tradewind_core::UserId;

use crate::api::{ApiError, CartLineRequest};
use crate::cart::stock::QuantityChange;
use crate::cart::{CartLine, LineKey, PricingSummary, StockGuard};
use crate::catalog::{Product, VariantResolver, VariantSelection};
use crate::error::{CartError, Result};
use crate::session::SessionContext;

/// The remote cart API as the model consumes it.
///
/// Implemented by [`crate::api::StoreClient`] for the real service and by
/// in-process mocks in tests.
#[allow(async_fn_in_trait)]
pub trait CartBackend {
    /// Fetch the current cart lines for a user.
    async fn fetch_cart(&self, user: &UserId) -> std::result::Result<Vec<CartLine>, ApiError>;

    /// Add a line; returns the updated cart lines.
    async fn add_line(
        &self,
        user: &UserId,
        request: &CartLineRequest,
    ) -> std::result::Result<Vec<CartLine>, ApiError>;

    /// Change a line's quantity; returns the updated cart lines.
    async fn update_line(
        &self,
        user: &UserId,
        request: &CartLineRequest,
    ) -> std::result::Result<Vec<CartLine>, ApiError>;

    /// Remove a line; returns the updated cart lines.
    async fn remove_line(
        &self,
        user: &UserId,
        request: &CartLineRequest,
    ) -> std::result::Result<Vec<CartLine>, ApiError>;
}

/// Client-side cart for one session.
///
/// Cheaply cloneable; clones share the same state.
pub struct CartModel<B> {
    inner: Arc<CartModelInner<B>>,
}

impl<B> Clone for CartModel<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CartModelInner<B> {
    backend: B,
    session: SessionContext,
    guard: StockGuard,
    state: Mutex<CartState>,
}

#[derive(Default)]
struct CartState {
    lines: Vec<CartLine>,
    /// Latest intent generation per line; absent means no request in flight.
    intents: HashMap<LineKey, u64>,
    next_intent: u64,
}

impl CartState {
    fn begin_intent(&mut self, key: &LineKey) -> u64 {
        self.next_intent += 1;
        self.intents.insert(key.clone(), self.next_intent);
        self.next_intent
    }

    fn intent_is_current(&self, key: &LineKey, intent: u64) -> bool {
        self.intents.get(key) == Some(&intent)
    }

    fn finish_intent(&mut self, key: &LineKey) {
        self.intents.remove(key);
    }

    fn position(&self, key: &LineKey) -> Option<usize> {
        self.lines.iter().position(|line| &line.key == key)
    }

    /// Apply the server's view of one line onto local state: replace it in
    /// place, append it, or drop it when the server no longer has it.
    fn reconcile_line(&mut self, key: &LineKey, server_lines: &[CartLine]) {
        let server_line = server_lines.iter().find(|line| &line.key == key);
        match (self.position(key), server_line) {
            (Some(pos), Some(line)) => {
                if let Some(slot) = self.lines.get_mut(pos) {
                    *slot = line.clone();
                }
            }
            (None, Some(line)) => self.lines.push(line.clone()),
            (Some(pos), None) => {
                self.lines.remove(pos);
            }
            (None, None) => {}
        }
    }
}

impl<B: CartBackend> CartModel<B> {
    /// Create a cart for a session.
    pub fn new(backend: B, session: SessionContext, guard: StockGuard) -> Self {
        Self {
            inner: Arc::new(CartModelInner {
                backend,
                session,
                guard,
                state: Mutex::new(CartState::default()),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn user(&self) -> Result<&UserId> {
        self.inner
            .session
            .user_id()
            .ok_or(CartError::NotAuthenticated)
    }

    /// Snapshot of the current cart lines, consistent for one render pass.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().lines.clone()
    }

    /// Pricing summary derived fresh from the current lines.
    #[must_use]
    pub fn summary(&self) -> PricingSummary {
        PricingSummary::from_lines(&self.lock().lines)
    }

    /// Current quantity of a line, if present.
    #[must_use]
    pub fn quantity_of(&self, key: &LineKey) -> Option<u32> {
        self.lock()
            .lines
            .iter()
            .find(|line| &line.key == key)
            .map(|line| line.quantity)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().lines.is_empty()
    }

    /// Add a quantity of a selected variant to the cart.
    ///
    /// Validates the selection and stock locally first, then asks the
    /// server; on success the result merges into an existing line for the
    /// same (product, variant, size) or appends a new one, never a
    /// duplicate. On any failure local state is unchanged.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated`, `SelectionIncomplete`, `VariantNotFound`,
    /// `StockExceeded` before any request; `Network` after.
    #[tracing::instrument(skip_all, fields(product = %product.id))]
    pub async fn add(
        &self,
        product: &Product,
        selection: &VariantSelection,
        quantity: u32,
    ) -> Result<()> {
        let user = self.user()?;
        let resolved = VariantResolver::new(product).resolve(selection)?;
        let stock = resolved.available_stock()?;

        let key = LineKey {
            product_id: product.id.clone(),
            variant_id: resolved.variant.variant_id.clone(),
            size: resolved.size().cloned(),
        };

        let (intent, combined) = {
            let mut state = self.lock();
            let existing = state
                .lines
                .iter()
                .find(|line| line.key == key)
                .map_or(0, |line| line.quantity);
            let combined = existing.saturating_add(quantity);
            self.inner.guard.check(stock, combined)?;
            (state.begin_intent(&key), combined)
        };

        let request = CartLineRequest {
            product_id: key.product_id.clone(),
            variant_id: key.variant_id.clone(),
            selected_size: key.size.clone(),
            selected_color: resolved.variant.color.clone(),
            selected_ram: resolved.variant.ram.clone(),
            selected_rom: resolved.variant.rom.clone(),
            quantity,
        };

        let response = self.inner.backend.add_line(user, &request).await;

        let mut state = self.lock();
        if !state.intent_is_current(&key, intent) {
            tracing::debug!("discarding superseded add response");
            return Ok(());
        }
        state.finish_intent(&key);

        match response {
            Ok(server_lines) => {
                if server_lines.iter().any(|line| line.key == key) {
                    state.reconcile_line(&key, &server_lines);
                } else {
                    // Success indicator without an echo of the cart: merge
                    // locally from the catalog snapshot.
                    let merged = CartLine {
                        key: key.clone(),
                        name: product.name.clone(),
                        color: resolved.variant.color.clone(),
                        ram: resolved.variant.ram.clone(),
                        rom: resolved.variant.rom.clone(),
                        image: resolved.variant.images.first().cloned(),
                        price: resolved.variant.price,
                        offer_price: resolved.variant.offer_price,
                        quantity: combined,
                        available_stock: stock,
                    };
                    state.reconcile_line(&key, &[merged]);
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "add to cart failed");
                Err(err.into())
            }
        }
    }

    /// Set a line's quantity. A requested quantity below 1 is a removal.
    ///
    /// The local quantity updates optimistically and is reconciled with the
    /// server response; on failure it rolls back to the prior value.
    ///
    /// # Errors
    ///
    /// `VariantNotFound` when the line does not exist, `StockExceeded`
    /// beyond `min(stock, cap)` (quantity left unchanged), `Network` on
    /// request failure (quantity rolled back).
    #[tracing::instrument(skip_all, fields(variant = %key.variant_id, quantity = new_quantity))]
    pub async fn set_quantity(&self, key: &LineKey, new_quantity: u32) -> Result<()> {
        let new_quantity = match StockGuard::classify(new_quantity) {
            QuantityChange::Remove => return self.remove(key).await,
            QuantityChange::Set(quantity) => quantity,
        };
        let user = self.user()?;

        let (intent, prior, request) = {
            let mut state = self.lock();
            let position = state.position(key).ok_or(CartError::VariantNotFound)?;
            let guard = self.inner.guard;
            let line = state
                .lines
                .get_mut(position)
                .ok_or(CartError::VariantNotFound)?;
            guard.check(line.available_stock, new_quantity)?;

            let prior = line.quantity;
            line.quantity = new_quantity;
            let request = request_for(line, new_quantity);
            (state.begin_intent(key), prior, request)
        };

        let response = self.inner.backend.update_line(user, &request).await;

        let mut state = self.lock();
        if !state.intent_is_current(key, intent) {
            tracing::debug!("discarding superseded quantity response");
            return Ok(());
        }
        state.finish_intent(key);

        match response {
            Ok(server_lines) => {
                state.reconcile_line(key, &server_lines);
                Ok(())
            }
            Err(err) => {
                if let Some(position) = state.position(key)
                    && let Some(line) = state.lines.get_mut(position)
                {
                    line.quantity = prior;
                }
                tracing::warn!(error = %err, "quantity update failed, rolled back");
                Err(err.into())
            }
        }
    }

    /// Remove a line from the cart, server-side and locally.
    ///
    /// Idempotent: removing an absent line is a no-op success and issues
    /// no request.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a session user; `Network` on request
    /// failure (the line is restored).
    #[tracing::instrument(skip_all, fields(variant = %key.variant_id))]
    pub async fn remove(&self, key: &LineKey) -> Result<()> {
        let user = self.user()?;

        let (intent, position, removed) = {
            let mut state = self.lock();
            let Some(position) = state.position(key) else {
                return Ok(());
            };
            let removed = state.lines.remove(position);
            (state.begin_intent(key), position, removed)
        };

        let request = request_for(&removed, 0);
        let response = self.inner.backend.remove_line(user, &request).await;

        let mut state = self.lock();
        if !state.intent_is_current(key, intent) {
            tracing::debug!("discarding superseded remove response");
            return Ok(());
        }
        state.finish_intent(key);

        match response {
            Ok(_) => Ok(()),
            Err(err) => {
                let position = position.min(state.lines.len());
                state.lines.insert(position, removed);
                tracing::warn!(error = %err, "remove failed, line restored");
                Err(err.into())
            }
        }
    }

    /// Replace the local cart with the server's, discarding pending
    /// intents. This is the synchronization point after login and after
    /// any external mutation whose result isn't directly returned.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a session user; `Network` on request
    /// failure, leaving the previous local state intact.
    #[tracing::instrument(skip_all)]
    pub async fn refresh(&self) -> Result<()> {
        let user = self.user()?;
        let server_lines = self.inner.backend.fetch_cart(user).await?;

        let mut state = self.lock();
        state.lines = server_lines;
        state.intents.clear();
        Ok(())
    }

    /// Empty the local cart. Called after checkout completion, which
    /// clears the cart server-side.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.lines.clear();
        state.intents.clear();
    }
}

fn request_for(line: &CartLine, quantity: u32) -> CartLineRequest {
    CartLineRequest {
        product_id: line.key.product_id.clone(),
        variant_id: line.key.variant_id.clone(),
        selected_size: line.key.size.clone(),
        selected_color: line.color.clone(),
        selected_ram: line.ram.clone(),
        selected_rom: line.rom.clone(),
        quantity,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::types::tests::electronics_variant;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tradewind_core::{Category, ProductId};

    /// Echoes every mutation back as a one-line cart built from the
    /// request, tracking how many requests were issued.
    #[derive(Default)]
    struct EchoBackend {
        requests: AtomicU32,
        stock: u32,
    }

    impl EchoBackend {
        fn with_stock(stock: u32) -> Self {
            Self {
                requests: AtomicU32::new(0),
                stock,
            }
        }

        fn line_for(&self, request: &CartLineRequest) -> CartLine {
            CartLine {
                key: LineKey {
                    product_id: request.product_id.clone(),
                    variant_id: request.variant_id.clone(),
                    size: request.selected_size.clone(),
                },
                name: "echo".to_owned(),
                color: request.selected_color.clone(),
                ram: request.selected_ram.clone(),
                rom: request.selected_rom.clone(),
                image: None,
                price: crate::catalog::types::tests::price(rust_decimal::dec!(1000)),
                offer_price: None,
                quantity: request.quantity,
                available_stock: self.stock,
            }
        }
    }

    impl CartBackend for EchoBackend {
        async fn fetch_cart(
            &self,
            _user: &UserId,
        ) -> std::result::Result<Vec<CartLine>, ApiError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn add_line(
            &self,
            _user: &UserId,
            _request: &CartLineRequest,
        ) -> std::result::Result<Vec<CartLine>, ApiError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn update_line(
            &self,
            _user: &UserId,
            request: &CartLineRequest,
        ) -> std::result::Result<Vec<CartLine>, ApiError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(vec![self.line_for(request)])
        }

        async fn remove_line(
            &self,
            _user: &UserId,
            _request: &CartLineRequest,
        ) -> std::result::Result<Vec<CartLine>, ApiError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }
    }

    fn phone() -> Product {
        Product {
            id: ProductId::new("phone-x"),
            name: "Phone-X".to_owned(),
            category: Category::Phone,
            brand: "Acme".to_owned(),
            description: String::new(),
            variants: vec![
                electronics_variant("v1", "Black", "4GB", "64GB", 2),
                electronics_variant("v2", "Black", "8GB", "128GB", 0),
            ],
            rating: None,
        }
    }

    fn model(backend: EchoBackend) -> CartModel<EchoBackend> {
        CartModel::new(
            backend,
            SessionContext::for_user(UserId::new("u-1")),
            StockGuard::new(),
        )
    }

    #[tokio::test]
    async fn test_add_requires_signed_in_user() {
        let cart = CartModel::new(
            EchoBackend::with_stock(5),
            SessionContext::anonymous(),
            StockGuard::new(),
        );
        let product = phone();
        let selection = VariantSelection::electronics("Black", "4GB", "64GB");

        let err = cart.add(&product, &selection, 1).await.unwrap_err();
        assert!(matches!(err, CartError::NotAuthenticated));
        assert!(cart.is_empty());
        // Fail-fast: no request was issued.
        assert_eq!(cart.inner.backend.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_add_merges_same_selection_into_one_line() {
        let cart = model(EchoBackend::with_stock(2));
        let product = phone();
        let selection = VariantSelection::electronics("Black", "4GB", "64GB");

        cart.add(&product, &selection, 1).await.unwrap();
        cart.add(&product, &selection, 1).await.unwrap();

        let lines = cart.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_add_out_of_stock_variant_is_blocked_locally() {
        let cart = model(EchoBackend::with_stock(0));
        let product = phone();
        let selection = VariantSelection::electronics("Black", "8GB", "128GB");

        let err = cart.add(&product, &selection, 1).await.unwrap_err();
        assert!(matches!(err, CartError::StockExceeded { remaining: 0 }));
        assert!(cart.is_empty());
        assert_eq!(cart.inner.backend.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_add_past_combined_stock_is_blocked() {
        let cart = model(EchoBackend::with_stock(2));
        let product = phone();
        let selection = VariantSelection::electronics("Black", "4GB", "64GB");

        cart.add(&product, &selection, 2).await.unwrap();
        let err = cart.add(&product, &selection, 1).await.unwrap_err();
        assert!(matches!(err, CartError::StockExceeded { remaining: 2 }));
        let lines = cart.lines();
        assert_eq!(lines.first().unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_set_quantity_zero_removes_line() {
        let cart = model(EchoBackend::with_stock(5));
        let product = phone();
        let selection = VariantSelection::electronics("Black", "4GB", "64GB");

        cart.add(&product, &selection, 1).await.unwrap();
        let key = cart.lines().first().unwrap().key.clone();

        cart.set_quantity(&key, 0).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let cart = model(EchoBackend::with_stock(5));
        let product = phone();
        let selection = VariantSelection::electronics("Black", "4GB", "64GB");

        cart.add(&product, &selection, 1).await.unwrap();
        let key = cart.lines().first().unwrap().key.clone();
        let issued_before = cart.inner.backend.requests.load(Ordering::SeqCst);

        cart.remove(&key).await.unwrap();
        cart.remove(&key).await.unwrap();

        assert!(cart.is_empty());
        // Second remove was a local no-op.
        assert_eq!(
            cart.inner.backend.requests.load(Ordering::SeqCst),
            issued_before + 1
        );
    }

    #[tokio::test]
    async fn test_unknown_line_quantity_change_fails() {
        let cart = model(EchoBackend::with_stock(5));
        let key = LineKey {
            product_id: ProductId::new("ghost"),
            variant_id: tradewind_core::VariantId::new("v0"),
            size: None,
        };
        assert!(matches!(
            cart.set_quantity(&key, 2).await,
            Err(CartError::VariantNotFound)
        ));
    }
}
