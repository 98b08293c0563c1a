//! Domain models.
//!
//! These are the records held by the in-memory stores in [`crate::db`] and
//! serialized (camelCase) in API responses.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::CartItem;
pub use order::Order;
pub use product::Product;
pub use user::User;
