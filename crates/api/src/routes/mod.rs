//! HTTP routes.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness
//!
//! # Users
//! GET|POST        /api/users
//! GET|PUT|DELETE  /api/users/{id}
//! POST            /api/auth
//! POST            /api/auth/logout
//!
//! # Products
//! GET  /api/products
//! GET  /api/products/search
//! GET  /api/products/featured
//! GET  /api/products/category/{category}
//! GET  /api/products/{id}
//!
//! # Cart
//! POST        /api/cart
//! GET         /api/cart/{userId}
//! DELETE      /api/cart/{userId}/clear
//! DELETE|PUT  /api/cart/{userId}/{productId}
//!
//! # Checkout and orders
//! POST /api/checkout
//! POST /api/checkout/validate
//! POST /api/checkout/calculate
//! GET  /api/orders/{orderId}
//! GET  /api/orders/user/{userId}
//! ```

pub mod cart;
pub mod checkout;
pub mod health;
pub mod products;
pub mod users;

use axum::{Json, Router, http::StatusCode, middleware, response::IntoResponse};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id_middleware, response_time_middleware};
use crate::state::AppState;

/// All routes, without state or middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(products::router())
        .merge(cart::router())
        .merge(checkout::router())
}

/// The complete application: routes, fallback and middleware.
pub fn app(state: AppState) -> Router {
    routes()
        .fallback(not_found)
        .layer(middleware::from_fn(response_time_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            },
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Leading integer of a query value: optional whitespace and sign, then
/// digits. Anything after the digits is ignored, so `"10abc"` reads as 10.
/// Returns `None` when no digit leads the value.
pub(crate) fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let digits = rest.get(..end).filter(|d| !d.is_empty())?;
    let value = digits.bytes().fold(0_i64, |acc, d| {
        acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
    });
    Some(if negative { -value } else { value })
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}
