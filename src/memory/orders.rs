//! In-memory orders service and checkout.

use async_trait::async_trait;
use jiff::Timestamp;

use crate::{
    auth::{CurrentUser, UserId},
    domain::orders::{
        OrdersService,
        errors::OrdersServiceError,
        models::{
            CheckoutRequest, Order, OrderId, OrderItem, OrderItemId, OrderStatus, ProductSnapshot,
            StatusPolicy,
        },
        service::{check_transition, order_total},
    },
    memory::{MemoryStore, store::State},
};

#[derive(Debug, Clone)]
pub struct MemoryOrdersService {
    store: MemoryStore,
    policy: StatusPolicy,
}

impl MemoryOrdersService {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self::with_status_policy(store, StatusPolicy::default())
    }

    #[must_use]
    pub fn with_status_policy(store: MemoryStore, policy: StatusPolicy) -> Self {
        Self { store, policy }
    }
}

#[async_trait]
impl OrdersService for MemoryOrdersService {
    async fn create_order(
        &self,
        actor: CurrentUser,
        request: CheckoutRequest,
    ) -> Result<Order, OrdersServiceError> {
        if !request.has_required_fields() {
            return Err(OrdersServiceError::MissingRequiredData);
        }

        // Holding the lock end to end makes the whole checkout atomic:
        // the stock check, the decrements, the inserts, and the cart
        // clear happen with no interleaving, and returning early on any
        // error leaves the state untouched.
        let mut state = self.store.lock().await;

        if let Some(key) = request.idempotency_key.as_deref() {
            if let Some(order) = find_by_idempotency_key(&state, actor.user_id, key) {
                tracing::info!(order = %order.uuid, "checkout replayed via idempotency key");

                return Ok(order);
            }
        }

        let lines = state.cart_lines(actor.user_id);

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let total_price = order_total(&lines)?;

        // Check every line before touching anything, so a failure on
        // the third line cannot leave the first two decremented.
        for line in &lines {
            let stock = state
                .products
                .get(&line.entry.product_id)
                .map_or(0, |product| product.stock);

            if stock < line.entry.quantity {
                tracing::warn!(
                    product = %line.entry.product_id,
                    requested = line.entry.quantity,
                    "stock conflict during checkout, rolling back"
                );

                return Err(OrdersServiceError::InsufficientStock {
                    product: line.entry.product_id,
                    requested: line.entry.quantity,
                });
            }
        }

        let order_id = OrderId::new();
        let mut items = Vec::with_capacity(lines.len());

        for line in &lines {
            if let Some(product) = state.products.get_mut(&line.entry.product_id) {
                product.stock -= line.entry.quantity;
            }

            items.push(OrderItem {
                uuid: OrderItemId::new(),
                order_id,
                product_id: line.entry.product_id,
                quantity: line.entry.quantity,
                price: line.product.price,
                product: ProductSnapshot {
                    title: line.product.title.clone(),
                    image: line.product.image.clone(),
                    category: line.product.category.clone(),
                },
            });
        }

        let order = Order {
            uuid: order_id,
            user_id: actor.user_id,
            total_price,
            status: OrderStatus::Pending,
            created_at: Timestamp::now(),
            items,
            idempotency_key: request.idempotency_key,
        };

        state.orders.insert(order.uuid, order.clone());
        state.clear_cart(actor.user_id);

        tracing::info!(
            order = %order.uuid,
            user = %actor.user_id,
            total_price,
            items = order.items.len(),
            "order created"
        );

        Ok(order)
    }

    async fn get_user_orders(&self, actor: CurrentUser) -> Result<Vec<Order>, OrdersServiceError> {
        let state = self.store.lock().await;

        let orders = state
            .orders
            .values()
            .filter(|order| order.user_id == actor.user_id)
            .cloned()
            .collect();

        Ok(newest_first(orders))
    }

    async fn get_all_orders(&self, actor: CurrentUser) -> Result<Vec<Order>, OrdersServiceError> {
        actor.require_admin()?;

        let state = self.store.lock().await;

        Ok(newest_first(state.orders.values().cloned().collect()))
    }

    async fn get_order(
        &self,
        actor: CurrentUser,
        order: OrderId,
    ) -> Result<Order, OrdersServiceError> {
        let state = self.store.lock().await;

        let order = state
            .orders
            .get(&order)
            .ok_or(OrdersServiceError::NotFound)?;

        actor.require_owner(order.user_id)?;

        Ok(order.clone())
    }

    async fn update_status(
        &self,
        actor: CurrentUser,
        order: OrderId,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError> {
        actor.require_admin()?;

        let mut state = self.store.lock().await;

        let order = state
            .orders
            .get_mut(&order)
            .ok_or(OrdersServiceError::NotFound)?;

        check_transition(self.policy, order.status, status)?;

        let from = order.status;
        order.status = status;

        tracing::info!(order = %order.uuid, %from, to = %status, "order status updated");

        Ok(())
    }
}

fn find_by_idempotency_key(state: &State, user: UserId, key: &str) -> Option<Order> {
    state
        .orders
        .values()
        .find(|order| order.user_id == user && order.idempotency_key.as_deref() == Some(key))
        .cloned()
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| (b.created_at, b.uuid).cmp(&(a.created_at, a.uuid)));
    orders
}
