//! Deferred order confirmation.
//!
//! Every new order gets one background task that waits for the confirmation
//! delay and then moves the stored order from `pending` to `confirmed`. Tasks
//! are keyed by order id and can be cancelled one at a time or all together
//! at shutdown. A cancelled order simply stays `pending`.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use shopfast_core::{OrderId, OrderStatus};

use crate::db::Database;

/// Schedules the `pending -> confirmed` transition for orders.
///
/// Cheap to clone; clones share the same set of pending tasks.
#[derive(Clone)]
pub struct ConfirmationScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    db: Arc<Database>,
    delay: Duration,
    pending: DashMap<OrderId, CancellationToken>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
}

impl ConfirmationScheduler {
    #[must_use]
    pub fn new(db: Arc<Database>, delay: Duration) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                db,
                delay,
                pending: DashMap::new(),
                shutdown: CancellationToken::new(),
                tracker: TaskTracker::new(),
            }),
        }
    }

    /// Start the confirmation timer for an order.
    ///
    /// Must be called from within a tokio runtime. After [`shutdown`](Self::shutdown)
    /// new timers are not started.
    pub fn schedule(&self, order_id: OrderId) {
        if self.inner.shutdown.is_cancelled() {
            warn!(order_id = %order_id, "Scheduler stopped, order will stay pending");
            return;
        }

        let token = self.inner.shutdown.child_token();
        self.inner.pending.insert(order_id.clone(), token.clone());

        let inner = Arc::clone(&self.inner);
        self.inner.tracker.spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(inner.delay) => {
                    let confirmed = inner.db.write().orders.transition(
                        &order_id,
                        OrderStatus::Pending,
                        OrderStatus::Confirmed,
                    );
                    if confirmed {
                        info!(order_id = %order_id, "Order confirmed");
                    } else {
                        debug!(order_id = %order_id, "Order no longer pending, nothing to confirm");
                    }
                }
                () = token.cancelled() => {
                    debug!(order_id = %order_id, "Order confirmation cancelled");
                }
            }
            inner.pending.remove(&order_id);
        });
    }

    /// Cancel one pending confirmation. Returns `false` if none was pending.
    pub fn cancel(&self, order_id: &OrderId) -> bool {
        match self.inner.pending.remove(order_id) {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.pending.len()
    }

    /// Cancel every pending confirmation and wait for the tasks to finish.
    pub async fn shutdown(&self) {
        let outstanding = self.pending_count();
        self.inner.shutdown.cancel();
        self.inner.tracker.close();
        self.inner.tracker.wait().await;
        info!(cancelled = outstanding, "Confirmation scheduler stopped");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use shopfast_core::{Price, UserId};

    use super::*;
    use crate::models::Order;

    const DELAY: Duration = Duration::from_millis(1000);

    fn db_with_order() -> (Arc<Database>, OrderId) {
        let db = Arc::new(Database::new());
        let id = {
            let mut stores = db.write();
            let id = stores.orders.next_id();
            stores.orders.append(Order {
                id: id.clone(),
                user_id: UserId::new("1"),
                items: Vec::new(),
                total: Price::ZERO,
                status: OrderStatus::Pending,
                created_at: Utc::now(),
            });
            id
        };
        (db, id)
    }

    fn status(db: &Database, id: &OrderId) -> OrderStatus {
        db.read().orders.get_by_id(id).unwrap().status
    }

    /// Let spawned tasks observe the advanced clock.
    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirms_after_delay() {
        let (db, id) = db_with_order();
        let scheduler = ConfirmationScheduler::new(Arc::clone(&db), DELAY);

        scheduler.schedule(id.clone());
        assert_eq!(scheduler.pending_count(), 1);

        tokio::time::advance(Duration::from_millis(999)).await;
        settle().await;
        assert_eq!(status(&db, &id), OrderStatus::Pending);

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(status(&db, &id), OrderStatus::Confirmed);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_keeps_order_pending() {
        let (db, id) = db_with_order();
        let scheduler = ConfirmationScheduler::new(Arc::clone(&db), DELAY);

        scheduler.schedule(id.clone());
        assert!(scheduler.cancel(&id));
        assert!(!scheduler.cancel(&id));

        tokio::time::advance(DELAY * 2).await;
        settle().await;
        assert_eq!(status(&db, &id), OrderStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_everything() {
        let (db, id) = db_with_order();
        let scheduler = ConfirmationScheduler::new(Arc::clone(&db), DELAY);

        scheduler.schedule(id.clone());
        scheduler.shutdown().await;
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(status(&db, &id), OrderStatus::Pending);

        // Nothing new starts after shutdown
        scheduler.schedule(id.clone());
        assert_eq!(scheduler.pending_count(), 0);
    }
}
