//! Integration tests for checkout across sessions, storage and the order backend.

use std::sync::Arc;
use std::time::Duration;

use common::{OwnerId, UserId};
use domain::{Money, Product, QuantityLimits};
use store::{CART_KEY, InMemorySessionStorage};
use storefront::{
    AccountService, AlwaysConfirm, CatalogService, CheckoutOrchestrator, CheckoutOutcome,
    CheckoutState, ConfirmedTotal, InMemoryAccountService, InMemoryCatalogService,
    InMemoryOrderService, OrderService, Session,
};

fn open_session(storage: &InMemorySessionStorage) -> Session<InMemorySessionStorage> {
    Session::open(storage.clone(), QuantityLimits::default())
}

fn backpack() -> Product {
    Product::new("1", "Backpack", Money::from_cents(1000), "bags")
}

fn shirt() -> Product {
    Product::new("2", "Shirt", Money::from_cents(550), "clothing")
}

fn fill(session: &Session<InMemorySessionStorage>) {
    session.cart().add_to_cart(backpack(), 2).unwrap();
    session.cart().add_to_cart(shirt(), 3).unwrap();
}

#[tokio::test]
async fn test_guest_checkout_records_snapshot_and_clears_once() {
    let storage = InMemorySessionStorage::new();
    let session = open_session(&storage);
    fill(&session);

    let orders = InMemoryOrderService::new();
    let orchestrator = CheckoutOrchestrator::new(orders.clone());

    let outcome = orchestrator.checkout(&session, &AlwaysConfirm).await;
    let CheckoutOutcome::Placed { order_id, total } = outcome else {
        panic!("expected Placed, got {outcome:?}");
    };
    assert_eq!(total, Money::from_cents(3650));

    let order = orders.get_order(order_id).await.unwrap().unwrap();
    assert!(order.owner_id.is_guest());
    assert_eq!(order.owner_id, session.owner_id());
    assert_eq!(order.total_price, Money::from_cents(3650));
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].product.title, "Backpack");
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.items[1].quantity, 3);

    assert_eq!(orders.create_calls(), 1);
    assert!(session.cart().is_empty());
    assert!(!storage.contains_key(CART_KEY));
}

#[tokio::test]
async fn test_signed_in_checkout_uses_user_id() {
    let accounts = InMemoryAccountService::with_cost(4);
    let profile = accounts
        .register("shopper@example.com", "hunter22", Some("Shopper"))
        .await
        .unwrap();

    let session = open_session(&InMemorySessionStorage::new());
    session.sign_in(&profile.uid).unwrap();
    fill(&session);

    let orders = InMemoryOrderService::new();
    let orchestrator = CheckoutOrchestrator::new(orders.clone());
    assert!(orchestrator.checkout(&session, &AlwaysConfirm).await.is_placed());

    let history = orders.list_orders(&OwnerId::user(&profile.uid)).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].owner_id.as_str(), profile.uid.as_str());
}

#[tokio::test]
async fn test_failed_checkout_can_be_retried() {
    let storage = InMemorySessionStorage::new();
    let session = open_session(&storage);
    fill(&session);

    let orders = InMemoryOrderService::new();
    orders.set_fail_on_create(true);
    let orchestrator = CheckoutOrchestrator::new(orders.clone());

    let first = orchestrator.checkout(&session, &AlwaysConfirm).await;
    assert!(matches!(first, CheckoutOutcome::Failed { .. }));
    assert_eq!(session.cart().totals().item_count, 5);
    assert_eq!(open_session(&storage).cart().totals().item_count, 5);

    orders.set_fail_on_create(false);
    let second = orchestrator.checkout(&session, &AlwaysConfirm).await;
    assert!(second.is_placed());
    assert_eq!(orders.create_calls(), 2);
    assert_eq!(orders.order_count(), 1);
}

#[tokio::test]
async fn test_stale_confirmed_total_is_declined() {
    let session = open_session(&InMemorySessionStorage::new());
    fill(&session);

    let orders = InMemoryOrderService::new();
    let orchestrator = CheckoutOrchestrator::new(orders.clone());

    let outcome = orchestrator
        .checkout(&session, &ConfirmedTotal(Money::from_cents(2000)))
        .await;

    assert_eq!(outcome, CheckoutOutcome::Declined);
    assert_eq!(orders.create_calls(), 0);
}

#[tokio::test]
async fn test_cart_stays_usable_while_order_is_pending() {
    let session = Arc::new(open_session(&InMemorySessionStorage::new()));
    fill(&session);

    let orders = InMemoryOrderService::new();
    orders.set_latency(Some(Duration::from_millis(100)));
    let orchestrator = Arc::new(CheckoutOrchestrator::new(orders.clone()));

    let pending = {
        let session = session.clone();
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.checkout(&session, &AlwaysConfirm).await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(session.checkout_state(), CheckoutState::Submitting);

    let late = Product::new("3", "Socks", Money::from_cents(300), "clothing");
    session.cart().add_to_cart(late, 1).unwrap();
    assert_eq!(session.cart().totals().item_count, 6);

    let second = orchestrator.checkout(&session, &AlwaysConfirm).await;
    assert_eq!(second, CheckoutOutcome::InProgress);

    let outcome = pending.await.unwrap();
    let CheckoutOutcome::Placed { order_id, total } = outcome else {
        panic!("expected Placed, got {outcome:?}");
    };

    assert_eq!(total, Money::from_cents(3650));
    let order = orders.get_order(order_id).await.unwrap().unwrap();
    assert_eq!(order.item_count(), 5);
    assert!(session.cart().is_empty());
    assert_eq!(orders.create_calls(), 1);
    assert_eq!(session.checkout_state(), CheckoutState::Placed);
}

#[tokio::test]
async fn test_catalog_snapshot_is_not_affected_by_edits() {
    let catalog = InMemoryCatalogService::with_sample_products();
    let session = open_session(&InMemorySessionStorage::new());

    let product = catalog.get_product(&"1".into()).await.unwrap();
    let original_price = product.price;
    session.cart().add_to_cart(product, 1).unwrap();

    catalog.delete_product(&"1".into()).await.unwrap();

    let cart = session.cart().snapshot();
    assert_eq!(cart.items()[0].unit_price(), original_price);

    let orchestrator = CheckoutOrchestrator::new(InMemoryOrderService::new());
    assert!(orchestrator.checkout(&session, &AlwaysConfirm).await.is_placed());
}

#[tokio::test]
async fn test_guest_identity_survives_sign_out() {
    let session = open_session(&InMemorySessionStorage::new());
    let guest = session.owner_id();

    session.sign_in(&UserId::new("u-1")).unwrap();
    assert!(!session.owner_id().is_guest());

    session.sign_out().unwrap();
    assert_eq!(session.owner_id(), guest);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_guest_orders_stay_in_history_under_concurrent_requests() {
    let dir = tempfile::tempdir().unwrap();
    let storage = store::DirectorySessionStorage::open(dir.path()).unwrap();
    let session = Arc::new(Session::open(storage, QuantityLimits::default()));
    session.cart().add_to_cart(backpack(), 1).unwrap();

    let orders = InMemoryOrderService::new();
    let orchestrator = Arc::new(CheckoutOrchestrator::new(orders.clone()));

    let mut tasks = Vec::new();
    for i in 0..8 {
        let session = session.clone();
        let orchestrator = orchestrator.clone();
        let orders = orders.clone();
        tasks.push(tokio::spawn(async move {
            if i == 0 {
                orchestrator.checkout(&session, &AlwaysConfirm).await;
            } else {
                orders.list_orders(&session.owner_id()).await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    session.cart().add_to_cart(shirt(), 2).unwrap();
    assert!(orchestrator.checkout(&session, &AlwaysConfirm).await.is_placed());

    let history = orders.list_orders(&session.owner_id()).await.unwrap();
    assert_eq!(orders.order_count(), 2);
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|o| o.owner_id.is_guest()));

    let reopened = Session::open(
        store::DirectorySessionStorage::open(dir.path()).unwrap(),
        QuantityLimits::default(),
    );
    assert_eq!(reopened.owner_id(), session.owner_id());
}
