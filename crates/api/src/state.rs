//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{ShopFastConfig, TimingConfig};
use crate::db::Database;
use crate::services::{CheckoutService, OrderService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; every clone sees the same stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopFastConfig,
    db: Arc<Database>,
    orders: OrderService,
    checkout: CheckoutService,
    started_at: Instant,
}

impl AppState {
    /// Create state over the seeded catalog and accounts.
    #[must_use]
    pub fn new(config: ShopFastConfig) -> Self {
        Self::with_database(config, Database::seeded())
    }

    /// Create state over an existing database.
    #[must_use]
    pub fn with_database(config: ShopFastConfig, db: Database) -> Self {
        let db = Arc::new(db);
        let orders = OrderService::new(Arc::clone(&db), config.timing.confirmation_delay);
        let checkout = CheckoutService::new(Arc::clone(&db), orders.clone(), config.timing);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                orders,
                checkout,
                started_at: Instant::now(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ShopFastConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn timing(&self) -> &TimingConfig {
        &self.inner.config.timing
    }

    /// The in-memory stores.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    /// Seconds since the state was created.
    #[must_use]
    pub fn uptime_secs(&self) -> f64 {
        self.inner.started_at.elapsed().as_secs_f64()
    }
}
