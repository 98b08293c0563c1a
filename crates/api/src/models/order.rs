//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopfast_core::{OrderId, OrderStatus, Price, UserId};

use super::CartItem;

/// A placed order.
///
/// `items` is a snapshot of the cart at creation time and `total` is frozen
/// at the prices of that moment. The only later change is `status` going
/// from `Pending` to `Confirmed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
