//! Cart reconciliation tests against an in-memory gateway fake.
//!
//! The fake emulates the server's cart semantics (variant-keyed lines,
//! case-insensitive identity, checkout empties the cart) and can be
//! scripted to fail, so the optimistic-then-reconcile behavior of
//! `CartService` is observable end to end.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use seamline_client::api::cart::CartGateway;
use seamline_client::api::types::{
    CartLineInput, CartLineItem, CartLineUpdate, CheckoutDetails, OrderConfirmation, User,
    VariantKey,
};
use seamline_client::api::ApiError;
use seamline_client::cart::{AddToCart, CartService, LineIdentity};
use seamline_client::session::Session;
use seamline_client::store::{KeyValueScope, MemoryScope, keys};
use seamline_core::{Email, ProductId, UserId};

#[derive(Clone, Default)]
struct FakeGateway {
    inner: Arc<FakeInner>,
}

#[derive(Default)]
struct FakeInner {
    items: Mutex<Vec<CartLineItem>>,
    fail_next_add: AtomicBool,
    fail_next_fetch: AtomicBool,
    reject_as_unauthorized: AtomicBool,
    fetch_calls: AtomicUsize,
    last_update: Mutex<Option<(ProductId, u32)>>,
}

impl FakeGateway {
    fn new() -> Self {
        Self::default()
    }

    fn seed(&self, items: Vec<CartLineItem>) {
        *self.inner.items.lock().unwrap() = items;
    }

    fn server_items(&self) -> Vec<CartLineItem> {
        self.inner.items.lock().unwrap().clone()
    }

    fn fail_next_add(&self) {
        self.inner.fail_next_add.store(true, Ordering::SeqCst);
    }

    fn fail_next_fetch(&self) {
        self.inner.fail_next_fetch.store(true, Ordering::SeqCst);
    }

    fn reject_as_unauthorized(&self) {
        self.inner
            .reject_as_unauthorized
            .store(true, Ordering::SeqCst);
    }

    fn fetch_calls(&self) -> usize {
        self.inner.fetch_calls.load(Ordering::SeqCst)
    }

    fn last_update(&self) -> Option<(ProductId, u32)> {
        *self.inner.last_update.lock().unwrap()
    }
}

impl CartGateway for FakeGateway {
    async fn fetch_cart(&self) -> Result<Vec<CartLineItem>, ApiError> {
        self.inner.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.reject_as_unauthorized.load(Ordering::SeqCst) {
            return Err(ApiError::Unauthorized);
        }
        if self.inner.fail_next_fetch.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 500,
                message: "server error".to_string(),
            });
        }
        Ok(self.server_items())
    }

    async fn add_item(
        &self,
        product_id: ProductId,
        input: &CartLineInput,
    ) -> Result<(), ApiError> {
        if self.inner.fail_next_add.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Validation("quantity rejected".to_string()));
        }

        let identity =
            LineIdentity::new(product_id, input.color.as_deref(), input.size.as_deref());
        let mut items = self.inner.items.lock().unwrap();
        match items.iter_mut().find(|item| item.identity() == identity) {
            Some(existing) => existing.quantity += input.quantity,
            None => items.push(server_line(
                product_id,
                input.color.as_deref(),
                input.size.as_deref(),
                input.quantity,
            )),
        }
        Ok(())
    }

    async fn update_item(
        &self,
        product_id: ProductId,
        update: &CartLineUpdate,
    ) -> Result<(), ApiError> {
        *self.inner.last_update.lock().unwrap() = Some((product_id, update.quantity));

        let identity =
            LineIdentity::new(product_id, update.color.as_deref(), update.size.as_deref());
        let mut items = self.inner.items.lock().unwrap();
        if let Some(existing) = items.iter_mut().find(|item| item.identity() == identity) {
            existing.quantity = update.quantity;
        }
        Ok(())
    }

    async fn remove_item(
        &self,
        product_id: ProductId,
        variant: &VariantKey,
    ) -> Result<(), ApiError> {
        let identity = LineIdentity::of(product_id, variant);
        let mut items = self.inner.items.lock().unwrap();
        items.retain(|item| item.identity() != identity);
        Ok(())
    }

    async fn checkout(&self, _details: &CheckoutDetails) -> Result<OrderConfirmation, ApiError> {
        let mut items = self.inner.items.lock().unwrap();
        if items.is_empty() {
            return Err(ApiError::Validation("cart is empty".to_string()));
        }
        items.clear();
        Ok(OrderConfirmation {
            order_id: Some(seamline_core::OrderId::new(42)),
            message: Some("Order placed".to_string()),
        })
    }
}

fn server_line(
    product_id: ProductId,
    color: Option<&str>,
    size: Option<&str>,
    quantity: u32,
) -> CartLineItem {
    CartLineItem {
        product_id,
        quantity,
        color: color.map(str::to_string),
        size: size.map(str::to_string),
        unit_price: Decimal::new(1000, 2),
        display_name: format!("Item {product_id}"),
        image_url: None,
    }
}

fn signed_in_service(gateway: FakeGateway) -> CartService<FakeGateway> {
    let scope = MemoryScope::shared();
    let session = Session::new(Arc::clone(&scope) as Arc<dyn KeyValueScope>);
    session.sign_in(
        "tok-test",
        &User {
            id: UserId::new(1),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            avatar: None,
        },
    );
    CartService::new(gateway, session, scope)
}

fn checkout_details() -> CheckoutDetails {
    CheckoutDetails {
        name: "Ada".to_string(),
        surname: "Lovelace".to_string(),
        email: Email::parse("ada@example.com").unwrap(),
        address: "1 Analytical Way".to_string(),
        zip_code: "12345".to_string(),
    }
}

#[tokio::test]
async fn add_merges_same_variant_case_insensitively() {
    let gateway = FakeGateway::new();
    gateway.seed(vec![server_line(
        ProductId::new(7),
        Some("Red"),
        Some("m"),
        2,
    )]);

    let mut service = signed_in_service(gateway.clone());
    service
        .add(
            ProductId::new(7),
            AddToCart::quantity(3).color("red").size("M"),
        )
        .await
        .unwrap();

    assert_eq!(service.items().len(), 1);
    assert_eq!(service.items().first().unwrap().quantity, 5);
    assert_eq!(gateway.server_items().first().unwrap().quantity, 5);
    assert!(service.state().is_drawer_open());
}

#[tokio::test]
async fn add_of_new_variant_appends_a_line() {
    let gateway = FakeGateway::new();
    gateway.seed(vec![server_line(
        ProductId::new(7),
        Some("red"),
        Some("M"),
        1,
    )]);

    let mut service = signed_in_service(gateway);
    service
        .add(
            ProductId::new(7),
            AddToCart::quantity(1).color("red").size("L"),
        )
        .await
        .unwrap();

    // Same product, different size: two distinct lines.
    assert_eq!(service.items().len(), 2);
    let last = service.items().last().unwrap();
    assert_eq!(last.size.as_deref(), Some("L"));
    // Display fields came from the refresh, not the placeholder.
    assert!(!last.display_name.is_empty());
}

#[tokio::test]
async fn failed_add_keeps_optimistic_items_and_opens_drawer() {
    let gateway = FakeGateway::new();
    gateway.fail_next_add();

    let mut service = signed_in_service(gateway.clone());
    let result = service
        .add(ProductId::new(5), AddToCart::quantity(2).color("blue"))
        .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
    // The optimistic line stays until the next successful refresh.
    assert_eq!(service.items().len(), 1);
    assert_eq!(service.items().first().unwrap().quantity, 2);
    assert!(gateway.server_items().is_empty());
    assert!(service.state().is_drawer_open());
}

#[tokio::test]
async fn refresh_skips_gateway_when_unauthenticated() {
    let gateway = FakeGateway::new();
    gateway.seed(vec![server_line(ProductId::new(1), None, None, 1)]);

    let scope = MemoryScope::shared();
    let session = Session::new(Arc::clone(&scope) as Arc<dyn KeyValueScope>);
    let mut service = CartService::new(gateway.clone(), session, scope);

    service.refresh().await.unwrap();

    assert!(service.items().is_empty());
    assert_eq!(gateway.fetch_calls(), 0);
}

#[tokio::test]
async fn unauthorized_refresh_means_empty_cart_not_error() {
    let gateway = FakeGateway::new();
    let mut service = signed_in_service(gateway.clone());
    service
        .add(ProductId::new(3), AddToCart::quantity(1))
        .await
        .unwrap();
    assert_eq!(service.items().len(), 1);

    // Token expired server-side: the session still holds a credential,
    // but the gateway now rejects it.
    gateway.reject_as_unauthorized();
    service.refresh().await.unwrap();

    assert!(service.items().is_empty());
}

#[tokio::test]
async fn transient_refresh_failure_keeps_items_and_reports() {
    let gateway = FakeGateway::new();
    let mut service = signed_in_service(gateway.clone());
    service
        .add(ProductId::new(3), AddToCart::quantity(2))
        .await
        .unwrap();

    gateway.fail_next_fetch();
    let result = service.refresh().await;

    assert!(matches!(result, Err(ApiError::Api { status: 500, .. })));
    assert_eq!(service.items().len(), 1);
    assert!(!service.state().is_syncing());
}

#[tokio::test]
async fn decrement_never_goes_below_one() {
    let gateway = FakeGateway::new();
    gateway.seed(vec![server_line(
        ProductId::new(7),
        Some("red"),
        Some("M"),
        1,
    )]);

    let mut service = signed_in_service(gateway.clone());
    service.refresh().await.unwrap();

    let variant = VariantKey::new("red", "M");
    service.decrement(ProductId::new(7), 1, &variant).await.unwrap();

    assert_eq!(gateway.last_update(), Some((ProductId::new(7), 1)));
    assert_eq!(service.items().first().unwrap().quantity, 1);
}

#[tokio::test]
async fn increment_targets_the_displayed_quantity() {
    let gateway = FakeGateway::new();
    gateway.seed(vec![server_line(
        ProductId::new(7),
        Some("red"),
        Some("M"),
        4,
    )]);

    let mut service = signed_in_service(gateway.clone());
    service.refresh().await.unwrap();

    let variant = VariantKey::new("red", "M");
    service.increment(ProductId::new(7), 4, &variant).await.unwrap();

    assert_eq!(gateway.last_update(), Some((ProductId::new(7), 5)));
    assert_eq!(service.items().first().unwrap().quantity, 5);
}

#[tokio::test]
async fn remove_is_scoped_to_the_variant() {
    let gateway = FakeGateway::new();
    gateway.seed(vec![
        server_line(ProductId::new(7), Some("red"), Some("M"), 2),
        server_line(ProductId::new(7), Some("red"), Some("L"), 1),
    ]);

    let mut service = signed_in_service(gateway.clone());
    service.refresh().await.unwrap();
    assert_eq!(service.items().len(), 2);

    service
        .remove(ProductId::new(7), &VariantKey::new("RED", "m"))
        .await
        .unwrap();

    assert_eq!(service.items().len(), 1);
    assert_eq!(service.items().first().unwrap().size.as_deref(), Some("L"));
}

#[tokio::test]
async fn checkout_returns_confirmation_and_empties_the_cart() {
    let gateway = FakeGateway::new();
    let mut service = signed_in_service(gateway);
    service
        .add(ProductId::new(2), AddToCart::quantity(1))
        .await
        .unwrap();

    let confirmation = service.checkout(&checkout_details()).await.unwrap();

    assert_eq!(
        confirmation.order_id,
        Some(seamline_core::OrderId::new(42))
    );
    assert!(service.items().is_empty());
}

#[tokio::test]
async fn checkout_of_empty_cart_is_a_validation_error() {
    let gateway = FakeGateway::new();
    let mut service = signed_in_service(gateway);

    let result = service.checkout(&checkout_details()).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn cart_mirror_survives_a_service_restart() {
    let gateway = FakeGateway::new();
    let scope = MemoryScope::shared();
    let session = Session::new(Arc::clone(&scope) as Arc<dyn KeyValueScope>);
    session.sign_in(
        "tok",
        &User {
            id: UserId::new(1),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            avatar: None,
        },
    );

    let mut service = CartService::new(
        gateway.clone(),
        session.clone(),
        Arc::clone(&scope) as Arc<dyn KeyValueScope>,
    );
    service
        .add(
            ProductId::new(9),
            AddToCart::quantity(2).color("green").size("S"),
        )
        .await
        .unwrap();

    assert!(scope.get(keys::CART_ITEMS).unwrap().is_some());

    // A new service over the same scope sees the mirrored items before
    // any network call.
    let restarted = CartService::new(gateway, session, scope);
    assert_eq!(restarted.items().len(), 1);
    assert_eq!(restarted.items().first().unwrap().quantity, 2);
}
