//! Order engine.
//!
//! Turns a user's cart into an order: prices the lines at current catalog
//! prices, takes the units out of stock, snapshots the lines, clears the cart
//! and schedules the confirmation. All store changes happen under one write
//! guard.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, instrument, warn};

use shopfast_core::{OrderId, OrderStatus, Price, UserId};

use super::scheduler::ConfirmationScheduler;
use crate::db::Database;
use crate::models::Order;

/// Creates and looks up orders.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<Database>,
    scheduler: ConfirmationScheduler,
}

impl OrderService {
    #[must_use]
    pub fn new(db: Arc<Database>, confirmation_delay: Duration) -> Self {
        let scheduler = ConfirmationScheduler::new(Arc::clone(&db), confirmation_delay);
        Self { db, scheduler }
    }

    /// Place an order from everything in the user's cart.
    ///
    /// Returns `None` when the cart is empty. The returned order is still
    /// `pending`; the stored copy becomes `confirmed` once the scheduler's
    /// delay has passed.
    ///
    /// A failed stock decrement does not stop the order: the line is still
    /// charged and shipped, and stock is left where it was.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub fn create_order(&self, user_id: &UserId) -> Option<Order> {
        let order = {
            let mut guard = self.db.write();
            let stores = &mut *guard;

            let items = stores.carts.by_user(user_id);
            if items.is_empty() {
                return None;
            }

            let mut total = Price::ZERO;
            for item in &items {
                let Some(price) = stores.catalog.get_by_id(&item.product_id).map(|p| p.price)
                else {
                    continue;
                };
                total = total + price.times(item.quantity);
                if !stores.catalog.decrement_stock(&item.product_id, item.quantity) {
                    warn!(
                        product_id = %item.product_id,
                        quantity = item.quantity,
                        "Not enough stock for ordered quantity"
                    );
                }
            }

            let order = Order {
                id: stores.orders.next_id(),
                user_id: user_id.clone(),
                items,
                total,
                status: OrderStatus::Pending,
                created_at: Utc::now(),
            };
            stores.orders.append(order.clone());
            stores.carts.clear(user_id);
            order
        };

        self.scheduler.schedule(order.id.clone());
        info!(order_id = %order.id, total = %order.total, "Order created");
        Some(order)
    }

    #[must_use]
    pub fn get_order(&self, id: &OrderId) -> Option<Order> {
        self.db.read().orders.get_by_id(id).cloned()
    }

    #[must_use]
    pub fn orders_for_user(&self, user_id: &UserId) -> Vec<Order> {
        self.db.read().orders.by_user(user_id)
    }

    /// Stop pending confirmations. Orders not yet confirmed stay `pending`.
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
    }
}
