//! Business logic on top of the in-memory stores.

pub mod auth;
pub mod checkout;
pub mod latency;
pub mod orders;
pub mod scheduler;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutService};
pub use orders::OrderService;
pub use scheduler::ConfirmationScheduler;
