//! ShopFast Core - Shared types library.
//!
//! This crate provides common types used across ShopFast components:
//! - `api` - The HTTP service (users, products, cart, checkout)
//! - `integration-tests` - Black-box tests against a running service
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
