//! Integration test support for Tradewind.
//!
//! Provides an in-process mock of the remote cart service plus catalog
//! fixtures. The mock can gate responses behind channels so tests control
//! the order in which responses arrive - independent of the order the
//! requests were issued - which is how the last-intent-wins cart property
//! is exercised without a live server.
//!
//! # Example
//!
//! ```rust,ignore
//! let service = MockCartService::new();
//! let release_first = service.gate();  // holds the next response
//! let release_second = service.gate(); // holds the one after
//!
//! // ... issue two requests, then release them out of order:
//! release_second.send(()).ok();
//! release_first.send(()).ok();
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::{Decimal, dec};
use tokio::sync::oneshot;

use tradewind_core::{Category, CurrencyCode, Price, ProductId, Size, UserId, VariantId};
use tradewind_storefront::api::{ApiError, CartLineRequest};
use tradewind_storefront::cart::model::CartBackend;
use tradewind_storefront::cart::{CartLine, CartModel, LineKey, StockGuard};
use tradewind_storefront::catalog::{Inventory, Product, SizeStock, Variant};
use tradewind_storefront::session::SessionContext;

/// Initialize test logging once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradewind_storefront=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Pricing/stock the mock service reports for a variant.
#[derive(Debug, Clone)]
pub struct VariantSpec {
    pub price: Decimal,
    pub offer_price: Option<Decimal>,
    pub stock: u32,
}

impl Default for VariantSpec {
    fn default() -> Self {
        Self {
            price: dec!(100),
            offer_price: None,
            stock: 10,
        }
    }
}

/// In-process stand-in for the remote cart service.
///
/// Cheaply cloneable; clones share state, so a test can keep one handle
/// for gating/inspection while the cart model owns another.
#[derive(Clone, Default)]
pub struct MockCartService {
    inner: Arc<Mutex<ServiceState>>,
}

#[derive(Default)]
struct ServiceState {
    specs: HashMap<VariantId, VariantSpec>,
    lines: Vec<CartLine>,
    gates: VecDeque<oneshot::Receiver<()>>,
    fail_next: Option<(u16, String)>,
    requests: u32,
}

impl MockCartService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register pricing/stock for a variant.
    pub fn set_spec(&self, variant_id: VariantId, spec: VariantSpec) {
        self.lock().specs.insert(variant_id, spec);
    }

    /// Queue a gate: the next un-gated request will wait until the
    /// returned sender fires (or is dropped) before responding.
    #[must_use]
    pub fn gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().gates.push_back(rx);
        tx
    }

    /// Make the next request fail with this status and message.
    pub fn fail_next(&self, status: u16, message: &str) {
        self.lock().fail_next = Some((status, message.to_owned()));
    }

    /// Total requests the service has handled.
    #[must_use]
    pub fn request_count(&self) -> u32 {
        self.lock().requests
    }

    /// The service's own view of the cart lines.
    #[must_use]
    pub fn server_lines(&self) -> Vec<CartLine> {
        self.lock().lines.clone()
    }

    fn line_for(state: &ServiceState, request: &CartLineRequest, quantity: u32) -> CartLine {
        let spec = state
            .specs
            .get(&request.variant_id)
            .cloned()
            .unwrap_or_default();
        CartLine {
            key: LineKey {
                product_id: request.product_id.clone(),
                variant_id: request.variant_id.clone(),
                size: request.selected_size.clone(),
            },
            name: request.product_id.to_string(),
            color: request.selected_color.clone(),
            ram: request.selected_ram.clone(),
            rom: request.selected_rom.clone(),
            image: None,
            price: Price::new(spec.price, CurrencyCode::USD),
            offer_price: spec
                .offer_price
                .map(|amount| Price::new(amount, CurrencyCode::USD)),
            quantity,
            available_stock: spec.stock,
        }
    }

    /// Gate, failure injection, and request counting shared by all
    /// endpoints. Returns the response the endpoint should produce.
    async fn respond(
        &self,
        apply: impl FnOnce(&mut ServiceState) -> Vec<CartLine>,
    ) -> Result<Vec<CartLine>, ApiError> {
        let gate = {
            let mut state = self.lock();
            state.requests += 1;
            state.gates.pop_front()
        };
        // Held outside the lock so concurrent requests interleave.
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let mut state = self.lock();
        if let Some((status, message)) = state.fail_next.take() {
            return Err(ApiError::Status { status, message });
        }
        Ok(apply(&mut state))
    }
}

impl CartBackend for MockCartService {
    async fn fetch_cart(&self, _user: &UserId) -> Result<Vec<CartLine>, ApiError> {
        self.respond(|state| state.lines.clone()).await
    }

    async fn add_line(
        &self,
        _user: &UserId,
        request: &CartLineRequest,
    ) -> Result<Vec<CartLine>, ApiError> {
        self.respond(|state| {
            let merged = match state.lines.iter_mut().find(|line| {
                line.key.product_id == request.product_id
                    && line.key.variant_id == request.variant_id
                    && line.key.size == request.selected_size
            }) {
                Some(line) => {
                    line.quantity += request.quantity;
                    line.clone()
                }
                None => {
                    let line = Self::line_for(state, request, request.quantity);
                    state.lines.push(line.clone());
                    line
                }
            };
            // The mutation response echoes the affected line's state at
            // the time this response is produced.
            vec![merged]
        })
        .await
    }

    async fn update_line(
        &self,
        _user: &UserId,
        request: &CartLineRequest,
    ) -> Result<Vec<CartLine>, ApiError> {
        self.respond(|state| {
            let updated = Self::line_for(state, request, request.quantity);
            if let Some(line) = state.lines.iter_mut().find(|line| line.key == updated.key) {
                line.quantity = request.quantity;
            }
            vec![updated]
        })
        .await
    }

    async fn remove_line(
        &self,
        _user: &UserId,
        request: &CartLineRequest,
    ) -> Result<Vec<CartLine>, ApiError> {
        self.respond(|state| {
            state.lines.retain(|line| {
                !(line.key.product_id == request.product_id
                    && line.key.variant_id == request.variant_id
                    && line.key.size == request.selected_size)
            });
            state.lines.clone()
        })
        .await
    }
}

// =============================================================================
// Catalog Fixtures
// =============================================================================

/// Electronics fixture: two Black RAM/ROM combinations, one out of stock.
#[must_use]
pub fn phone_x() -> Product {
    Product {
        id: ProductId::new("phone-x"),
        name: "Phone-X".to_owned(),
        category: Category::Phone,
        brand: "Acme".to_owned(),
        description: "Flagship phone".to_owned(),
        variants: vec![
            electronics_variant("pxv-1", "Black", "4GB", "64GB", dec!(1000), Some(dec!(800)), 2),
            electronics_variant("pxv-2", "Black", "8GB", "128GB", dec!(1200), None, 0),
        ],
        rating: None,
    }
}

/// Fashion fixture: one red hoodie with a single size M unit.
#[must_use]
pub fn hoodie() -> Product {
    Product {
        id: ProductId::new("hoodie"),
        name: "Hoodie".to_owned(),
        category: Category::Clothing,
        brand: "Acme".to_owned(),
        description: "Heavyweight hoodie".to_owned(),
        variants: vec![Variant {
            variant_id: VariantId::new("hv-1"),
            color: "Red".to_owned(),
            ram: None,
            rom: None,
            price: Price::new(dec!(40), CurrencyCode::USD),
            offer_price: None,
            images: vec![],
            inventory: Inventory::Sized(vec![SizeStock {
                size: Size::M,
                stock: 1,
            }]),
        }],
        rating: None,
    }
}

fn electronics_variant(
    id: &str,
    color: &str,
    ram: &str,
    rom: &str,
    price: Decimal,
    offer_price: Option<Decimal>,
    stock: u32,
) -> Variant {
    Variant {
        variant_id: VariantId::new(id),
        color: color.to_owned(),
        ram: Some(ram.to_owned()),
        rom: Some(rom.to_owned()),
        price: Price::new(price, CurrencyCode::USD),
        offer_price: offer_price.map(|amount| Price::new(amount, CurrencyCode::USD)),
        images: vec![],
        inventory: Inventory::Flat(stock),
    }
}

/// A cart model signed in as `user-1`, sharing state with `service`.
#[must_use]
pub fn signed_in_cart(service: &MockCartService) -> CartModel<MockCartService> {
    CartModel::new(
        service.clone(),
        SessionContext::for_user(UserId::new("user-1")),
        StockGuard::new(),
    )
}
