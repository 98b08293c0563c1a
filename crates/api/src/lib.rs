//! ShopFast API library.
//!
//! In-memory catalog, carts, accounts and orders behind an axum router. The
//! binary in `main.rs` wires this up with configuration, tracing and Sentry;
//! tests build the same router in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ShopFastConfig;
pub use routes::app;
pub use state::AppState;
