//! Cart domain types.

use serde::Serialize;

use shopfast_core::{ProductId, UserId};

/// One (user, product) line in a cart.
///
/// At most one line exists per pair; adding the same product again grows
/// `quantity` instead of creating a second line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
}
