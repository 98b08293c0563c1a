//! Cart store.
//!
//! Lines are keyed by `(user, product)`. Stock is checked against the
//! catalog's current level when a line is added but nothing is reserved:
//! several carts (or several adds to one cart) can together ask for more than
//! is on the shelf. Stock only moves when an order is placed.

use shopfast_core::{ProductId, UserId};

use super::{Catalog, Table};
use crate::models::CartItem;

type LineKey = (UserId, ProductId);

/// Result of [`Carts::update_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// Quantity was zero or negative; `existed` tells whether a line was removed.
    Removed { existed: bool },
    /// The line now holds the requested quantity.
    Updated(CartItem),
    /// Re-adding at the new quantity failed (unknown product or not enough
    /// stock). The previous line has already been removed.
    Rejected,
}

/// In-memory cart lines for all users.
#[derive(Debug, Default)]
pub struct Carts {
    lines: Table<LineKey, CartItem>,
}

impl Carts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of a product to a user's cart.
    ///
    /// Returns `None` if the product does not exist, if `quantity` is zero, or
    /// if `quantity` alone exceeds the product's current stock. An existing
    /// line for the same product is grown in place and returned.
    pub fn add(
        &mut self,
        catalog: &Catalog,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Option<CartItem> {
        let product = catalog.get_by_id(product_id)?;
        if quantity == 0 || product.stock < quantity {
            return None;
        }

        let key = (user_id.clone(), product_id.clone());
        if let Some(line) = self.lines.get_mut(&key) {
            line.quantity = line.quantity.saturating_add(quantity);
            return Some(line.clone());
        }

        let line = CartItem {
            user_id: user_id.clone(),
            product_id: product_id.clone(),
            quantity,
        };
        self.lines.insert(key, line.clone());
        Some(line)
    }

    /// A user's lines in the order they were first added.
    #[must_use]
    pub fn by_user(&self, user_id: &UserId) -> Vec<CartItem> {
        self.lines
            .values()
            .filter(|line| &line.user_id == user_id)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn is_empty_for(&self, user_id: &UserId) -> bool {
        !self.lines.values().any(|line| &line.user_id == user_id)
    }

    /// Remove one line. Returns whether it existed.
    pub fn remove(&mut self, user_id: &UserId, product_id: &ProductId) -> bool {
        self.lines
            .remove(&(user_id.clone(), product_id.clone()))
            .is_some()
    }

    /// Remove every line for a user. Clearing an empty cart is a no-op.
    pub fn clear(&mut self, user_id: &UserId) {
        self.lines.remove_where(|line| &line.user_id == user_id);
    }

    /// Set a line's quantity.
    ///
    /// `quantity <= 0` removes the line. Anything else removes the line and
    /// adds it back at the new quantity, so the stock check runs against the
    /// full new quantity rather than the difference.
    pub fn update_quantity(
        &mut self,
        catalog: &Catalog,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: i64,
    ) -> QuantityUpdate {
        let Ok(quantity) = u32::try_from(quantity) else {
            if quantity <= 0 {
                return QuantityUpdate::Removed {
                    existed: self.remove(user_id, product_id),
                };
            }
            // Larger than any stock level can be.
            self.remove(user_id, product_id);
            return QuantityUpdate::Rejected;
        };
        if quantity == 0 {
            return QuantityUpdate::Removed {
                existed: self.remove(user_id, product_id),
            };
        }

        self.remove(user_id, product_id);
        self.add(catalog, user_id, product_id, quantity)
            .map_or(QuantityUpdate::Rejected, QuantityUpdate::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        for product in seed::products() {
            catalog.insert(product);
        }
        catalog
    }

    fn uid(s: &str) -> UserId {
        UserId::new(s)
    }

    fn pid(s: &str) -> ProductId {
        ProductId::new(s)
    }

    #[test]
    fn test_add_creates_line() {
        let catalog = catalog();
        let mut carts = Carts::new();

        let line = carts.add(&catalog, &uid("1"), &pid("1"), 2);
        assert_eq!(
            line,
            Some(CartItem {
                user_id: uid("1"),
                product_id: pid("1"),
                quantity: 2
            })
        );
        assert_eq!(carts.by_user(&uid("1")).len(), 1);
    }

    #[test]
    fn test_add_merges_same_pair() {
        let catalog = catalog();
        let mut carts = Carts::new();

        carts.add(&catalog, &uid("1"), &pid("3"), 4);
        let merged = carts.add(&catalog, &uid("1"), &pid("3"), 6);

        assert_eq!(merged.map(|l| l.quantity), Some(10));
        let lines = carts.by_user(&uid("1"));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().map(|l| l.quantity), Some(10));
    }

    #[test]
    fn test_add_rejects_unknown_product_and_over_stock() {
        let catalog = catalog();
        let mut carts = Carts::new();

        assert!(carts.add(&catalog, &uid("1"), &pid("999"), 1).is_none());
        // product 4 has 15 in stock
        assert!(carts.add(&catalog, &uid("1"), &pid("4"), 16).is_none());
        assert!(carts.add(&catalog, &uid("1"), &pid("4"), 0).is_none());
        assert!(carts.is_empty_for(&uid("1")));
    }

    #[test]
    fn test_adds_can_collectively_exceed_stock() {
        let catalog = catalog();
        let mut carts = Carts::new();

        // Each add passes the check on its own (15 in stock)
        assert!(carts.add(&catalog, &uid("1"), &pid("4"), 10).is_some());
        assert!(carts.add(&catalog, &uid("1"), &pid("4"), 10).is_some());
        assert!(carts.add(&catalog, &uid("2"), &pid("4"), 15).is_some());

        assert_eq!(carts.by_user(&uid("1")).first().map(|l| l.quantity), Some(20));
    }

    #[test]
    fn test_by_user_keeps_insertion_order_and_isolation() {
        let catalog = catalog();
        let mut carts = Carts::new();
        carts.add(&catalog, &uid("1"), &pid("5"), 1);
        carts.add(&catalog, &uid("2"), &pid("1"), 1);
        carts.add(&catalog, &uid("1"), &pid("2"), 1);

        let products: Vec<_> = carts
            .by_user(&uid("1"))
            .into_iter()
            .map(|l| l.product_id.into_inner())
            .collect();
        assert_eq!(products, ["5", "2"]);
    }

    #[test]
    fn test_remove() {
        let catalog = catalog();
        let mut carts = Carts::new();
        carts.add(&catalog, &uid("1"), &pid("1"), 1);

        assert!(carts.remove(&uid("1"), &pid("1")));
        assert!(!carts.remove(&uid("1"), &pid("1")));
        assert!(!carts.remove(&uid("2"), &pid("1")));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let catalog = catalog();
        let mut carts = Carts::new();
        carts.add(&catalog, &uid("1"), &pid("1"), 1);
        carts.add(&catalog, &uid("1"), &pid("2"), 1);
        carts.add(&catalog, &uid("2"), &pid("2"), 1);

        carts.clear(&uid("1"));
        assert!(carts.by_user(&uid("1")).is_empty());
        carts.clear(&uid("1"));
        assert!(carts.by_user(&uid("1")).is_empty());
        carts.clear(&uid("nobody"));

        assert_eq!(carts.by_user(&uid("2")).len(), 1);
    }

    #[test]
    fn test_update_non_positive_removes() {
        let catalog = catalog();
        let mut carts = Carts::new();
        carts.add(&catalog, &uid("1"), &pid("1"), 3);

        assert_eq!(
            carts.update_quantity(&catalog, &uid("1"), &pid("1"), 0),
            QuantityUpdate::Removed { existed: true }
        );
        assert_eq!(
            carts.update_quantity(&catalog, &uid("1"), &pid("1"), -4),
            QuantityUpdate::Removed { existed: false }
        );
    }

    #[test]
    fn test_update_replaces_quantity() {
        let catalog = catalog();
        let mut carts = Carts::new();
        carts.add(&catalog, &uid("1"), &pid("1"), 3);

        let outcome = carts.update_quantity(&catalog, &uid("1"), &pid("1"), 7);
        assert!(matches!(outcome, QuantityUpdate::Updated(ref l) if l.quantity == 7));
        assert_eq!(carts.by_user(&uid("1")).len(), 1);
    }

    #[test]
    fn test_update_checks_full_quantity_against_stock() {
        let catalog = catalog();
        let mut carts = Carts::new();
        // Two adds of 10 give a line of 20 against a stock of 15
        carts.add(&catalog, &uid("1"), &pid("4"), 10);
        carts.add(&catalog, &uid("1"), &pid("4"), 10);

        // Lowering to 18 still exceeds stock, and the old line is gone
        assert_eq!(
            carts.update_quantity(&catalog, &uid("1"), &pid("4"), 18),
            QuantityUpdate::Rejected
        );
        assert!(carts.is_empty_for(&uid("1")));
    }
}
