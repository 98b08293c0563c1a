//! In-memory stores.
//!
//! # Stores
//!
//! - [`Accounts`] - Users, keyed by id, unique-by-convention email
//! - [`Catalog`] - Seeded products; stock is the only mutable field
//! - [`Carts`] - Cart lines keyed by (user, product)
//! - [`OrderBook`] - Append-only orders
//!
//! All four live behind one [`Database`] lock. A single write guard covers
//! every store, so multi-store steps such as placing an order are applied
//! all at once or not at all. Nothing is persisted; a restart reseeds.

mod carts;
mod catalog;
mod orders;
pub mod seed;
mod table;
mod users;

pub use carts::{Carts, QuantityUpdate};
pub use catalog::Catalog;
pub use orders::OrderBook;
pub use table::Table;
pub use users::Accounts;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Every store, borrowed together under one guard.
#[derive(Debug, Default)]
pub struct Stores {
    pub accounts: Accounts,
    pub catalog: Catalog,
    pub carts: Carts,
    pub orders: OrderBook,
}

/// Shared handle to the in-memory stores.
#[derive(Debug, Default)]
pub struct Database {
    stores: RwLock<Stores>,
}

impl Database {
    /// Empty stores, no users or products.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores loaded with the seed users and catalog.
    #[must_use]
    pub fn seeded() -> Self {
        let mut stores = Stores::default();
        for user in seed::users() {
            stores.accounts.insert(user);
        }
        for product in seed::products() {
            stores.catalog.insert(product);
        }
        Self {
            stores: RwLock::new(stores),
        }
    }

    /// Shared access for lookups.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn read(&self) -> RwLockReadGuard<'_, Stores> {
        self.stores.read()
    }

    /// Exclusive access for mutations.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn write(&self) -> RwLockWriteGuard<'_, Stores> {
        self.stores.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_database() {
        let db = Database::seeded();
        let stores = db.read();
        assert_eq!(stores.accounts.all().len(), 5);
        assert_eq!(stores.catalog.all().len(), 10);
        assert!(stores.orders.get_by_id(&shopfast_core::OrderId::new("1")).is_none());
    }

    #[test]
    fn test_empty_database() {
        let db = Database::new();
        assert!(db.read().catalog.all().is_empty());
    }
}
