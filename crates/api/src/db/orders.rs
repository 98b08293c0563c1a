//! Order store.
//!
//! Append-only: orders are never removed, and after creation only their
//! status changes.

use shopfast_core::{OrderId, OrderStatus, UserId};

use super::Table;
use crate::models::Order;

#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Table<OrderId, Order>,
}

impl OrderBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next appended order will get (`"1"`, `"2"`, ...).
    #[must_use]
    pub fn next_id(&self) -> OrderId {
        OrderId::from_seq(self.orders.len() as u64 + 1)
    }

    pub fn append(&mut self, order: Order) {
        self.orders.insert(order.id.clone(), order);
    }

    #[must_use]
    pub fn get_by_id(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// A user's orders in creation order.
    #[must_use]
    pub fn by_user(&self, user_id: &UserId) -> Vec<Order> {
        self.orders
            .values()
            .filter(|o| &o.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Move an order from `from` to `to`. Returns `false` if the order is
    /// unknown or no longer in `from`.
    pub fn transition(&mut self, id: &OrderId, from: OrderStatus, to: OrderStatus) -> bool {
        match self.orders.get_mut(id) {
            Some(order) if order.status == from => {
                order.status = to;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use shopfast_core::Price;

    use super::*;

    fn order(book: &OrderBook, user: &str) -> Order {
        Order {
            id: book.next_id(),
            user_id: UserId::new(user),
            items: Vec::new(),
            total: Price::ZERO,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sequential_ids() {
        let mut book = OrderBook::new();
        assert_eq!(book.next_id().as_str(), "1");
        book.append(order(&book, "1"));
        assert_eq!(book.next_id().as_str(), "2");
    }

    #[test]
    fn test_by_user() {
        let mut book = OrderBook::new();
        book.append(order(&book, "1"));
        book.append(order(&book, "2"));
        book.append(order(&book, "1"));

        let ids: Vec<_> = book
            .by_user(&UserId::new("1"))
            .into_iter()
            .map(|o| o.id.into_inner())
            .collect();
        assert_eq!(ids, ["1", "3"]);
        assert!(book.by_user(&UserId::new("3")).is_empty());
    }

    #[test]
    fn test_transition_only_from_expected_status() {
        let mut book = OrderBook::new();
        book.append(order(&book, "1"));
        let id = OrderId::new("1");

        assert!(book.transition(&id, OrderStatus::Pending, OrderStatus::Confirmed));
        assert!(!book.transition(&id, OrderStatus::Pending, OrderStatus::Confirmed));
        assert_eq!(
            book.get_by_id(&id).map(|o| o.status),
            Some(OrderStatus::Confirmed)
        );
        assert!(!book.transition(
            &OrderId::new("9"),
            OrderStatus::Pending,
            OrderStatus::Confirmed
        ));
    }
}
