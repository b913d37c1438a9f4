//! Order service trait and in-memory implementation.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, OwnerId};
use domain::{Money, Order, OrderItem};

use crate::error::OrderServiceError;

/// Trait for the order backend.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Records a new order and returns its ID.
    ///
    /// A single atomic append: either the whole order is stored or nothing
    /// is. The backend assigns `created_at`.
    async fn create_order(
        &self,
        owner_id: &OwnerId,
        items: Vec<OrderItem>,
        total_price: Money,
    ) -> Result<OrderId, OrderServiceError>;

    /// Fetches one order.
    async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>, OrderServiceError>;

    /// Lists the orders recorded against an owner, oldest first.
    async fn list_orders(&self, owner_id: &OwnerId) -> Result<Vec<Order>, OrderServiceError>;
}

#[async_trait]
impl<T: OrderService + ?Sized> OrderService for Arc<T> {
    async fn create_order(
        &self,
        owner_id: &OwnerId,
        items: Vec<OrderItem>,
        total_price: Money,
    ) -> Result<OrderId, OrderServiceError> {
        (**self).create_order(owner_id, items, total_price).await
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>, OrderServiceError> {
        (**self).get_order(order_id).await
    }

    async fn list_orders(&self, owner_id: &OwnerId) -> Result<Vec<Order>, OrderServiceError> {
        (**self).list_orders(owner_id).await
    }
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: Vec<Order>,
    create_calls: usize,
    fail_on_create: bool,
    latency: Option<Duration>,
}

/// In-memory order service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderService {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderService {
    /// Creates a new in-memory order service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the service to fail every create call.
    pub fn set_fail_on_create(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_on_create = fail;
        }
    }

    /// Delays every create call, simulating a slow backend.
    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut state) = self.state.write() {
            state.latency = latency;
        }
    }

    /// Returns the number of stored orders.
    pub fn order_count(&self) -> usize {
        self.state.read().map(|s| s.orders.len()).unwrap_or(0)
    }

    /// Returns how many times `create_order` was called, failures included.
    pub fn create_calls(&self) -> usize {
        self.state.read().map(|s| s.create_calls).unwrap_or(0)
    }

    /// Returns every stored order.
    pub fn orders(&self) -> Vec<Order> {
        self.state
            .read()
            .map(|s| s.orders.clone())
            .unwrap_or_default()
    }
}

fn poisoned() -> OrderServiceError {
    OrderServiceError::Unavailable("order lock poisoned".to_string())
}

#[async_trait]
impl OrderService for InMemoryOrderService {
    async fn create_order(
        &self,
        owner_id: &OwnerId,
        items: Vec<OrderItem>,
        total_price: Money,
    ) -> Result<OrderId, OrderServiceError> {
        let latency = {
            let mut state = self.state.write().map_err(|_| poisoned())?;
            state.create_calls += 1;
            state.latency
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.write().map_err(|_| poisoned())?;
        if state.fail_on_create {
            return Err(OrderServiceError::Unavailable("backend rejected the write".to_string()));
        }

        let order = Order {
            id: OrderId::new(),
            owner_id: owner_id.clone(),
            items,
            total_price,
            created_at: Utc::now(),
        };
        let order_id = order.id;
        state.orders.push(order);

        Ok(order_id)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>, OrderServiceError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.orders.iter().find(|o| o.id == order_id).cloned())
    }

    async fn list_orders(&self, owner_id: &OwnerId) -> Result<Vec<Order>, OrderServiceError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .orders
            .iter()
            .filter(|o| &o.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
