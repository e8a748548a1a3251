//! Orders service and the checkout orchestrator.

use async_trait::async_trait;
use mockall::automock;
use sqlx::error::{DatabaseError, ErrorKind};

use crate::{
    auth::CurrentUser,
    database::Db,
    domain::{
        carts::{PgCartEntriesRepository, models::CartLine},
        orders::{
            errors::OrdersServiceError,
            models::{CheckoutRequest, Order, OrderId, OrderItemId, OrderStatus, StatusPolicy},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        products::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    policy: StatusPolicy,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    cart_entries: PgCartEntriesRepository,
    products: PgProductsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self::with_status_policy(db, StatusPolicy::default())
    }

    #[must_use]
    pub fn with_status_policy(db: Db, policy: StatusPolicy) -> Self {
        Self {
            db,
            policy,
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            cart_entries: PgCartEntriesRepository::new(),
            products: PgProductsRepository::new(),
        }
    }

    /// Load an already-created order for an idempotency-key replay.
    async fn replay_order(
        &self,
        actor: CurrentUser,
        key: &str,
    ) -> Result<Option<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(mut order) = self
            .orders
            .find_by_idempotency_key(&mut tx, actor.user_id, key)
            .await?
        else {
            return Ok(None);
        };

        order.items = self.items.get_order_items(&mut tx, order.uuid).await?;

        tx.commit().await?;

        tracing::info!(order = %order.uuid, "checkout replayed via idempotency key");

        Ok(Some(order))
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(
        &self,
        actor: CurrentUser,
        request: CheckoutRequest,
    ) -> Result<Order, OrdersServiceError> {
        if !request.has_required_fields() {
            return Err(OrdersServiceError::MissingRequiredData);
        }

        if let Some(key) = request.idempotency_key.as_deref() {
            if let Some(order) = self.replay_order(actor, key).await? {
                return Ok(order);
            }
        }

        // One transaction covers the order insert, every item insert,
        // every stock decrement, and the cart clear. Returning early on
        // any error drops the transaction and rolls all of it back.
        let mut tx = self.db.begin().await?;

        let lines = self
            .cart_entries
            .get_cart_lines(&mut tx, actor.user_id)
            .await?;

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let total_price = order_total(&lines)?;

        let create_result = self
            .orders
            .create_order(
                &mut tx,
                OrderId::new(),
                actor.user_id,
                total_price,
                OrderStatus::Pending,
                request.idempotency_key.as_deref(),
            )
            .await;

        let mut order = match create_result {
            Ok(order) => order,
            // A concurrent submission with the same idempotency key
            // committed between our replay check and this insert. Hand
            // back the order that won.
            Err(error) if is_unique_violation(&error) => {
                drop(tx);

                if let Some(key) = request.idempotency_key.as_deref() {
                    if let Some(order) = self.replay_order(actor, key).await? {
                        return Ok(order);
                    }
                }

                return Err(error.into());
            }
            Err(error) => return Err(error.into()),
        };

        for line in &lines {
            let item = self
                .items
                .create_order_item(&mut tx, OrderItemId::new(), order.uuid, line)
                .await?;

            // The compare-and-decrement is the authoritative stock
            // check: zero affected rows means another checkout took the
            // stock after we read the cart.
            let rows_affected = self
                .products
                .decrement_stock(&mut tx, line.entry.product_id, line.entry.quantity)
                .await?;

            if rows_affected == 0 {
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

            order.items.push(item);
        }

        self.cart_entries.clear_cart(&mut tx, actor.user_id).await?;

        tx.commit().await?;

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
        let mut tx = self.db.begin().await?;

        let mut orders = self.orders.list_user_orders(&mut tx, actor.user_id).await?;

        for order in &mut orders {
            order.items = self.items.get_order_items(&mut tx, order.uuid).await?;
        }

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_all_orders(&self, actor: CurrentUser) -> Result<Vec<Order>, OrdersServiceError> {
        actor.require_admin()?;

        let mut tx = self.db.begin().await?;

        let mut orders = self.orders.list_all_orders(&mut tx).await?;

        for order in &mut orders {
            order.items = self.items.get_order_items(&mut tx, order.uuid).await?;
        }

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(
        &self,
        actor: CurrentUser,
        order: OrderId,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.orders.get_order(&mut tx, order).await?;

        actor.require_owner(order.user_id)?;

        order.items = self.items.get_order_items(&mut tx, order.uuid).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn update_status(
        &self,
        actor: CurrentUser,
        order: OrderId,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError> {
        actor.require_admin()?;

        let mut tx = self.db.begin().await?;

        let current = self.orders.get_order(&mut tx, order).await?;

        check_transition(self.policy, current.status, status)?;

        self.orders.update_status(&mut tx, order, status).await?;

        tx.commit().await?;

        tracing::info!(order = %order, from = %current.status, to = %status, "order status updated");

        Ok(())
    }
}

/// Total at live prices, exactly `Σ unit price * quantity`.
pub(crate) fn order_total(lines: &[CartLine]) -> Result<u64, OrdersServiceError> {
    lines.iter().try_fold(0_u64, |total, line| {
        line.product
            .price
            .checked_mul(u64::from(line.entry.quantity))
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or(OrdersServiceError::InvalidData)
    })
}

pub(crate) fn check_transition(
    policy: StatusPolicy,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<(), OrdersServiceError> {
    match policy {
        StatusPolicy::AnyRecognized => Ok(()),
        StatusPolicy::ForwardOnly if to.stage() >= from.stage() => Ok(()),
        StatusPolicy::ForwardOnly => Err(OrdersServiceError::InvalidStatusTransition { from, to }),
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(DatabaseError::kind)
        .is_some_and(|kind| matches!(kind, ErrorKind::UniqueViolation))
}

/// Append-only order ledger plus the cart-to-order transition.
#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Convert the caller's cart into an order: validate stock, insert
    /// the order and its items, decrement stock, clear the cart — all
    /// or nothing. Prices are read live at checkout time.
    async fn create_order(
        &self,
        actor: CurrentUser,
        request: CheckoutRequest,
    ) -> Result<Order, OrdersServiceError>;

    /// The caller's orders, newest first, items populated.
    async fn get_user_orders(&self, actor: CurrentUser) -> Result<Vec<Order>, OrdersServiceError>;

    /// Every order in the ledger, newest first. Admin only.
    async fn get_all_orders(&self, actor: CurrentUser) -> Result<Vec<Order>, OrdersServiceError>;

    /// One order with items. Owners see their own; admins see all.
    async fn get_order(
        &self,
        actor: CurrentUser,
        order: OrderId,
    ) -> Result<Order, OrdersServiceError>;

    /// Move an order to another recognized status. Admin only. The
    /// transition policy is fixed per service instance.
    async fn update_status(
        &self,
        actor: CurrentUser,
        order: OrderId,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use crate::{
        domain::{
            carts::CartsServiceError,
            products::models::ProductUpdate,
        },
        test::{TestContext, helpers::create_product},
    };

    use super::*;

    fn checkout() -> CheckoutRequest {
        CheckoutRequest::new("12 Rose Lane, Florence", "card")
    }

    #[tokio::test]
    async fn checkout_creates_order_clears_cart_and_decrements_stock() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;
        let lamp = create_product(&ctx, "Brass Lamp", 9_99, 4).await?;

        ctx.carts.add_entry(user, desk, 2).await?;
        ctx.carts.add_entry(user, lamp, 1).await?;

        let order = ctx.orders.create_order(user, checkout()).await?;

        assert_eq!(order.user_id, user.user_id);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_price, 49_99);
        assert_eq!(order.items.len(), 2);

        assert!(
            ctx.carts.get_cart(user).await?.is_empty(),
            "cart must be cleared by a successful checkout"
        );

        assert_eq!(ctx.products.get_product(desk).await?.stock, 8);
        assert_eq!(ctx.products.get_product(lamp).await?.stock, 3);

        Ok(())
    }

    #[tokio::test]
    async fn order_total_matches_sum_of_item_subtotals() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 19_99, 10).await?;
        let lamp = create_product(&ctx, "Brass Lamp", 10_00, 10).await?;

        ctx.carts.add_entry(user, desk, 1).await?;
        ctx.carts.add_entry(user, lamp, 3).await?;

        let order = ctx.orders.create_order(user, checkout()).await?;

        let item_sum: u64 = order
            .items
            .iter()
            .map(|item| item.price * u64::from(item.quantity))
            .sum();

        assert_eq!(order.total_price, item_sum);
        assert_eq!(order.total_price, 49_99);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_on_empty_cart_is_rejected_without_side_effects() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        create_product(&ctx, "Walnut Desk", 20_00, 10).await?;

        let result = ctx.orders.create_order(user, checkout()).await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
        assert!(ctx.orders.get_user_orders(user).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn checkout_requires_shipping_address_and_payment_method() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;
        ctx.carts.add_entry(user, desk, 1).await?;

        for request in [
            CheckoutRequest::new("", "card"),
            CheckoutRequest::new("12 Rose Lane", "   "),
        ] {
            let result = ctx.orders.create_order(user, request).await;

            assert!(
                matches!(result, Err(OrdersServiceError::MissingRequiredData)),
                "expected MissingRequiredData, got {result:?}"
            );
        }

        // The cart was never consumed.
        assert_eq!(ctx.carts.get_cart(user).await?.lines.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_uses_live_prices_not_cart_time_prices() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;

        ctx.carts.add_entry(user, desk, 1).await?;

        // Price changes between add-to-cart and checkout are honored at
        // checkout time.
        ctx.products
            .update_product(
                ctx.admin,
                desk,
                ProductUpdate {
                    title: "Walnut Desk".to_string(),
                    description: String::new(),
                    price: 25_00,
                    image: String::new(),
                    stock: 10,
                    category: String::new(),
                },
            )
            .await?;

        let order = ctx.orders.create_order(user, checkout()).await?;

        assert_eq!(order.total_price, 25_00);
        assert_eq!(order.items[0].price, 25_00);

        Ok(())
    }

    #[tokio::test]
    async fn order_snapshots_survive_later_product_edits() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;

        ctx.carts.add_entry(user, desk, 1).await?;
        let order = ctx.orders.create_order(user, checkout()).await?;

        ctx.products
            .update_product(
                ctx.admin,
                desk,
                ProductUpdate {
                    title: "Mahogany Desk".to_string(),
                    description: String::new(),
                    price: 99_00,
                    image: String::new(),
                    stock: 10,
                    category: String::new(),
                },
            )
            .await?;

        let fetched = ctx.orders.get_order(user, order.uuid).await?;

        assert_eq!(fetched.items[0].price, 20_00);
        assert_eq!(fetched.items[0].product.title, "Walnut Desk");
        assert_eq!(fetched.total_price, 20_00);

        Ok(())
    }

    #[tokio::test]
    async fn losing_checkout_rolls_back_and_keeps_cart() -> TestResult {
        let ctx = TestContext::new();
        let alice = ctx.customer();
        let bob = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 5).await?;

        // Both carts pass the advisory check against the initial stock.
        ctx.carts.add_entry(alice, desk, 3).await?;
        ctx.carts.add_entry(bob, desk, 3).await?;

        let won = ctx.orders.create_order(alice, checkout()).await?;
        assert_eq!(won.items[0].quantity, 3);
        assert_eq!(ctx.products.get_product(desk).await?.stock, 2);

        let lost = ctx.orders.create_order(bob, checkout()).await;
        match lost {
            Err(OrdersServiceError::InsufficientStock { product, requested }) => {
                assert_eq!(product, desk);
                assert_eq!(requested, 3);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // The loser keeps their cart, stock is untouched by the failed
        // attempt, and no second order exists.
        let bobs_cart = ctx.carts.get_cart(bob).await?;
        assert_eq!(bobs_cart.lines.len(), 1);
        assert_eq!(bobs_cart.lines[0].entry.quantity, 3);
        assert_eq!(ctx.products.get_product(desk).await?.stock, 2);
        assert!(ctx.orders.get_user_orders(bob).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_never_oversell() -> TestResult {
        let ctx = TestContext::new();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 5).await?;

        // Six buyers racing for five units, two each: at most two can
        // succeed and the accepted quantities must fit the stock.
        let mut buyers = Vec::new();
        for _ in 0..6 {
            let user = ctx.customer();
            ctx.carts.add_entry(user, desk, 2).await?;
            buyers.push(user);
        }

        let orders = Arc::clone(&ctx.orders);
        let carts = Arc::clone(&ctx.carts);

        let mut handles = Vec::new();
        for user in buyers {
            let orders = Arc::clone(&orders);
            handles.push(tokio::spawn(async move {
                (user, orders.create_order(user, checkout()).await)
            }));
        }

        let mut accepted = 0_u32;
        for handle in handles {
            let (user, result) = handle.await?;

            match result {
                Ok(order) => {
                    accepted += order.items[0].quantity;
                    assert!(carts.get_cart(user).await?.is_empty());
                }
                Err(OrdersServiceError::InsufficientStock { .. }) => {
                    // Rejected buyers keep their carts intact.
                    let cart = carts.get_cart(user).await?;
                    assert_eq!(cart.lines.len(), 1);
                    assert_eq!(cart.lines[0].entry.quantity, 2);
                }
                Err(other) => panic!("unexpected checkout failure: {other:?}"),
            }
        }

        let remaining = ctx.products.get_product(desk).await?.stock;

        assert!(accepted <= 5, "oversold: accepted {accepted} of 5");
        assert_eq!(remaining, 5 - accepted);

        Ok(())
    }

    #[tokio::test]
    async fn idempotency_key_replays_the_original_order() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;

        ctx.carts.add_entry(user, desk, 2).await?;

        let request = checkout().with_idempotency_key("tok-123");

        let first = ctx.orders.create_order(user, request.clone()).await?;
        let replay = ctx.orders.create_order(user, request).await?;

        assert_eq!(replay.uuid, first.uuid, "replay must not create a second order");
        assert_eq!(replay.total_price, first.total_price);
        assert_eq!(replay.items.len(), 1);

        // No double charge: stock went down once.
        assert_eq!(ctx.products.get_product(desk).await?.stock, 8);
        assert_eq!(ctx.orders.get_user_orders(user).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn double_submit_without_key_sees_empty_cart() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;

        ctx.carts.add_entry(user, desk, 2).await?;

        ctx.orders.create_order(user, checkout()).await?;
        let second = ctx.orders.create_order(user, checkout()).await;

        assert!(
            matches!(second, Err(OrdersServiceError::EmptyCart)),
            "expected EmptyCart on double submit, got {second:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_order_enforces_ownership() -> TestResult {
        let ctx = TestContext::new();
        let owner = ctx.customer();
        let stranger = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;

        ctx.carts.add_entry(owner, desk, 1).await?;
        let order = ctx.orders.create_order(owner, checkout()).await?;

        let denied = ctx.orders.get_order(stranger, order.uuid).await;
        assert!(
            matches!(denied, Err(OrdersServiceError::AccessDenied)),
            "expected AccessDenied, got {denied:?}"
        );

        // Admins may read any order.
        let fetched = ctx.orders.get_order(ctx.admin, order.uuid).await?;
        assert_eq!(fetched.uuid, order.uuid);

        let missing = ctx.orders.get_order(owner, OrderId::new()).await;
        assert!(
            matches!(missing, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {missing:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn user_orders_are_listed_newest_first() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;

        ctx.carts.add_entry(user, desk, 1).await?;
        let first = ctx.orders.create_order(user, checkout()).await?;

        ctx.carts.add_entry(user, desk, 2).await?;
        let second = ctx.orders.create_order(user, checkout()).await?;

        let orders = ctx.orders.get_user_orders(user).await?;

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].uuid, second.uuid);
        assert_eq!(orders[1].uuid, first.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn get_all_orders_is_admin_only() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;

        ctx.carts.add_entry(user, desk, 1).await?;
        ctx.orders.create_order(user, checkout()).await?;

        let denied = ctx.orders.get_all_orders(user).await;
        assert!(
            matches!(denied, Err(OrdersServiceError::AccessDenied)),
            "expected AccessDenied, got {denied:?}"
        );

        let all = ctx.orders.get_all_orders(ctx.admin).await?;
        assert_eq!(all.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn status_updates_are_admin_only() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;

        ctx.carts.add_entry(user, desk, 1).await?;
        let order = ctx.orders.create_order(user, checkout()).await?;

        let denied = ctx
            .orders
            .update_status(user, order.uuid, OrderStatus::Shipped)
            .await;
        assert!(
            matches!(denied, Err(OrdersServiceError::AccessDenied)),
            "expected AccessDenied, got {denied:?}"
        );

        ctx.orders
            .update_status(ctx.admin, order.uuid, OrderStatus::Shipped)
            .await?;

        let fetched = ctx.orders.get_order(user, order.uuid).await?;
        assert_eq!(fetched.status, OrderStatus::Shipped);

        Ok(())
    }

    // The default policy mirrors the observed system: any recognized
    // status is accepted, including jumps and backward moves.
    #[tokio::test]
    async fn default_policy_accepts_any_recognized_status() -> TestResult {
        let ctx = TestContext::new();
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;

        ctx.carts.add_entry(user, desk, 1).await?;
        let order = ctx.orders.create_order(user, checkout()).await?;

        // pending -> delivered (a jump), then delivered -> processing
        // (a backward move).
        ctx.orders
            .update_status(ctx.admin, order.uuid, OrderStatus::Delivered)
            .await?;
        ctx.orders
            .update_status(ctx.admin, order.uuid, OrderStatus::Processing)
            .await?;

        let fetched = ctx.orders.get_order(user, order.uuid).await?;
        assert_eq!(fetched.status, OrderStatus::Processing);

        Ok(())
    }

    #[tokio::test]
    async fn forward_only_policy_rejects_backward_moves() -> TestResult {
        let ctx = TestContext::with_status_policy(StatusPolicy::ForwardOnly);
        let user = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 10).await?;

        ctx.carts.add_entry(user, desk, 1).await?;
        let order = ctx.orders.create_order(user, checkout()).await?;

        ctx.orders
            .update_status(ctx.admin, order.uuid, OrderStatus::Shipped)
            .await?;

        // Re-applying the current status is idempotent.
        ctx.orders
            .update_status(ctx.admin, order.uuid, OrderStatus::Shipped)
            .await?;

        let backward = ctx
            .orders
            .update_status(ctx.admin, order.uuid, OrderStatus::Pending)
            .await;

        assert!(
            matches!(
                backward,
                Err(OrdersServiceError::InvalidStatusTransition {
                    from: OrderStatus::Shipped,
                    to: OrderStatus::Pending,
                })
            ),
            "expected InvalidStatusTransition, got {backward:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cart_level_check_cannot_replace_checkout_check() -> TestResult {
        // Regression shape for the §8 race: the cart accepts both
        // buyers against the same initial stock; only checkout's
        // conditional decrement may arbitrate.
        let ctx = TestContext::new();
        let alice = ctx.customer();
        let bob = ctx.customer();
        let desk = create_product(&ctx, "Walnut Desk", 20_00, 5).await?;

        ctx.carts.add_entry(alice, desk, 3).await?;
        let bob_add = ctx.carts.add_entry(bob, desk, 3).await;
        assert!(
            bob_add.is_ok(),
            "cart-level check is per-user and advisory, got {bob_add:?}"
        );

        ctx.orders.create_order(alice, checkout()).await?;

        // After Alice's checkout, Bob can no longer even set his cart
        // entry above the remaining stock.
        let bob_cart = ctx.carts.get_cart(bob).await?;
        let raise = ctx
            .carts
            .update_entry(bob, bob_cart.lines[0].entry.uuid, 4)
            .await;
        assert!(
            matches!(raise, Err(CartsServiceError::InsufficientStock { .. })),
            "expected InsufficientStock, got {raise:?}"
        );

        Ok(())
    }
}
