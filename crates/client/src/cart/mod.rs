//! Cart state and the reconciliation service.
//!
//! Every mutating operation follows the same shape: optimistic local
//! apply (for adds), network call, authoritative refresh. The server's view replaces local state entirely after every
//! successful mutation. Failures surface to the caller without rolling
//! the optimistic state back - the next successful refresh is the
//! correction mechanism.

pub mod totals;
pub mod variant;

pub use totals::{DELIVERY_FEE_UNITS, OrderTotals, subtotal, total_quantity};
pub use variant::{LineIdentity, find_line, merge_lines, normalize_color, normalize_size,
    same_variant};

use std::sync::Arc;

use rust_decimal::Decimal;
use seamline_core::ProductId;
use tracing::instrument;

use crate::api::ApiError;
use crate::api::cart::CartGateway;
use crate::api::types::{
    CartLineInput, CartLineItem, CartLineUpdate, CheckoutDetails, OrderConfirmation, VariantKey,
};
use crate::session::Session;
use crate::store::{KeyValueScope, keys};

/// In-memory cart state. Item order is insertion order and equals
/// display order; quantity is always >= 1 (a line reaching 0 is removed).
#[derive(Debug, Clone, Default)]
pub struct CartState {
    items: Vec<CartLineItem>,
    is_syncing: bool,
    is_drawer_open: bool,
}

impl CartState {
    /// The current line items in display order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether an authoritative fetch is in flight.
    #[must_use]
    pub const fn is_syncing(&self) -> bool {
        self.is_syncing
    }

    /// Whether the cart drawer is shown.
    #[must_use]
    pub const fn is_drawer_open(&self) -> bool {
        self.is_drawer_open
    }
}

/// Parameters for an add-to-cart operation.
#[derive(Debug, Clone)]
pub struct AddToCart {
    quantity: u32,
    variant: VariantKey,
}

impl Default for AddToCart {
    fn default() -> Self {
        Self {
            quantity: 1,
            variant: VariantKey::default(),
        }
    }
}

impl AddToCart {
    /// Add `quantity` units (at least 1) of the default variant.
    #[must_use]
    pub fn quantity(quantity: u32) -> Self {
        Self {
            quantity: quantity.max(1),
            ..Self::default()
        }
    }

    /// Select a color.
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.variant.color = Some(color.into());
        self
    }

    /// Select a size.
    #[must_use]
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.variant.size = Some(size.into());
        self
    }
}

/// The cart reconciliation service.
///
/// Owns [`CartState`]; all mutation funnels through its operations. The
/// gateway seam is a trait so tests can exercise the reconciliation
/// logic against an in-memory fake.
pub struct CartService<G> {
    gateway: G,
    session: Session,
    scope: Arc<dyn KeyValueScope>,
    state: CartState,
}

impl<G: CartGateway> CartService<G> {
    /// Create the service, seeding items from the persisted mirror. The
    /// mirror is read once here; the first [`refresh`](Self::refresh)
    /// replaces it with the server's view.
    #[must_use]
    pub fn new(gateway: G, session: Session, scope: Arc<dyn KeyValueScope>) -> Self {
        let items = hydrate_mirror(scope.as_ref());
        Self {
            gateway,
            session,
            scope,
            state: CartState {
                items,
                ..CartState::default()
            },
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// The current line items in display order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.state.items
    }

    /// Sum of `unit_price x quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        totals::subtotal(&self.state.items)
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        totals::total_quantity(&self.state.items)
    }

    /// Order totals including the delivery fee.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::for_items(&self.state.items)
    }

    /// Show the cart drawer.
    pub fn open_drawer(&mut self) {
        self.state.is_drawer_open = true;
    }

    /// Hide the cart drawer.
    pub fn close_drawer(&mut self) {
        self.state.is_drawer_open = false;
    }

    /// Add a product to the cart.
    ///
    /// The local merge happens first: an existing same-variant line has
    /// its quantity incremented (the server is not yet aware of the
    /// increment), otherwise a new line is appended. Then the gateway is
    /// told and the cart is re-fetched. The drawer opens whether or not
    /// the network step failed - the UI already committed to showing the
    /// operation's destination.
    ///
    /// # Errors
    ///
    /// Propagates gateway and refresh errors; the optimistic update is
    /// not rolled back.
    #[instrument(skip(self, add), fields(product_id = %product_id))]
    pub async fn add(&mut self, product_id: ProductId, add: AddToCart) -> Result<(), ApiError> {
        match find_line(&self.state.items, product_id, &add.variant) {
            Some(idx) => {
                if let Some(line) = self.state.items.get_mut(idx) {
                    line.quantity = line.quantity.saturating_add(add.quantity);
                }
            }
            None => {
                self.state
                    .items
                    .push(CartLineItem::placeholder(product_id, &add.variant, add.quantity));
            }
        }
        self.persist_mirror();

        let input = CartLineInput {
            quantity: add.quantity,
            color: add.variant.color.clone(),
            size: add.variant.size.clone(),
        };

        let outcome = match self.gateway.add_item(product_id, &input).await {
            Ok(()) => self.refresh().await,
            Err(e) => {
                tracing::warn!("add to cart failed, keeping optimistic items: {e}");
                Err(e)
            }
        };

        self.state.is_drawer_open = true;
        outcome
    }

    /// Increase a line's quantity by one, based on the quantity the
    /// caller is currently displaying.
    ///
    /// # Errors
    ///
    /// Propagates gateway and refresh errors.
    #[instrument(skip(self, variant), fields(product_id = %product_id))]
    pub async fn increment(
        &mut self,
        product_id: ProductId,
        current_quantity: u32,
        variant: &VariantKey,
    ) -> Result<(), ApiError> {
        self.set_quantity(product_id, current_quantity.saturating_add(1), variant)
            .await
    }

    /// Decrease a line's quantity by one, never below 1. Use
    /// [`remove`](Self::remove) to take a line to zero.
    ///
    /// # Errors
    ///
    /// Propagates gateway and refresh errors.
    #[instrument(skip(self, variant), fields(product_id = %product_id))]
    pub async fn decrement(
        &mut self,
        product_id: ProductId,
        current_quantity: u32,
        variant: &VariantKey,
    ) -> Result<(), ApiError> {
        let next = current_quantity.saturating_sub(1).max(1);
        self.set_quantity(product_id, next, variant).await
    }

    async fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        variant: &VariantKey,
    ) -> Result<(), ApiError> {
        let update = CartLineUpdate {
            quantity,
            color: variant.color.clone(),
            size: variant.size.clone(),
        };
        self.gateway.update_item(product_id, &update).await?;
        self.refresh().await
    }

    /// Remove the line matching the product and variant. Other variants
    /// of the same product stay in the cart.
    ///
    /// # Errors
    ///
    /// Propagates gateway and refresh errors.
    #[instrument(skip(self, variant), fields(product_id = %product_id))]
    pub async fn remove(
        &mut self,
        product_id: ProductId,
        variant: &VariantKey,
    ) -> Result<(), ApiError> {
        self.gateway.remove_item(product_id, variant).await?;
        self.refresh().await
    }

    /// Authoritative fetch: replaces the local item sequence with the
    /// server's view.
    ///
    /// Unauthenticated (no session, or a 401 from the gateway) means
    /// "cart is empty", not an error. Any other failure keeps the prior
    /// items and is returned.
    ///
    /// # Errors
    ///
    /// Returns transient and validation errors from the gateway.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        if !self.session.is_authenticated() {
            self.replace_items(Vec::new());
            return Ok(());
        }

        self.state.is_syncing = true;
        let result = self.gateway.fetch_cart().await;
        self.state.is_syncing = false;

        match result {
            Ok(items) => {
                self.replace_items(items);
                Ok(())
            }
            Err(ApiError::Unauthorized) => {
                self.replace_items(Vec::new());
                Ok(())
            }
            Err(e) => {
                tracing::warn!("cart refresh failed, keeping local items: {e}");
                Err(e)
            }
        }
    }

    /// Place the order, then refresh (the server empties the cart). A
    /// refresh failure after a successful checkout is logged, not
    /// propagated - the order already exists.
    ///
    /// # Errors
    ///
    /// Propagates checkout errors from the gateway.
    #[instrument(skip(self, details))]
    pub async fn checkout(
        &mut self,
        details: &CheckoutDetails,
    ) -> Result<OrderConfirmation, ApiError> {
        let confirmation = self.gateway.checkout(details).await?;
        if let Err(e) = self.refresh().await {
            tracing::warn!("post-checkout refresh failed: {e}");
        }
        Ok(confirmation)
    }

    fn replace_items(&mut self, items: Vec<CartLineItem>) {
        self.state.items = merge_lines(items);
        self.persist_mirror();
    }

    /// Mirror the item sequence to the persisted scope. Mirror failures
    /// must never fail a cart operation.
    fn persist_mirror(&self) {
        match serde_json::to_string(&self.state.items) {
            Ok(raw) => {
                if let Err(e) = self.scope.set(keys::CART_ITEMS, &raw) {
                    tracing::warn!("failed to persist cart mirror: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to encode cart mirror: {e}"),
        }
    }
}

/// Read the persisted mirror; unreadable state degrades to an empty cart.
fn hydrate_mirror(scope: &dyn KeyValueScope) -> Vec<CartLineItem> {
    let raw = match scope.get(keys::CART_ITEMS) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("failed to read cart mirror: {e}");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => merge_lines(items),
        Err(e) => {
            tracing::warn!("cart mirror is unreadable, starting empty: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::store::MemoryScope;

    #[test]
    fn test_hydrate_mirror_merges_and_drops_zero_quantities() {
        let scope = MemoryScope::new();
        scope
            .set(
                keys::CART_ITEMS,
                r#"[
                    {"id": 7, "quantity": 2, "color": "Red", "size": "m"},
                    {"id": 7, "quantity": 3, "color": "red", "size": "M"},
                    {"id": 9, "quantity": 0}
                ]"#,
            )
            .unwrap();

        let items = hydrate_mirror(&scope);
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_hydrate_mirror_tolerates_corrupt_state() {
        let scope = MemoryScope::new();
        scope.set(keys::CART_ITEMS, "{broken").unwrap();
        assert!(hydrate_mirror(&scope).is_empty());
    }

    #[test]
    fn test_add_to_cart_builder_floors_quantity_at_one() {
        let add = AddToCart::quantity(0);
        assert_eq!(add.quantity, 1);

        let add = AddToCart::quantity(3).color("Red").size("m");
        assert_eq!(add.quantity, 3);
        assert_eq!(add.variant.color.as_deref(), Some("Red"));
        assert_eq!(add.variant.size.as_deref(), Some("m"));
    }
}
