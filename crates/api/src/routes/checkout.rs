//! Checkout and order handlers.
//!
//! ```text
//! POST /api/checkout              - Place an order from the cart
//! POST /api/checkout/validate     - Dry-run the checkout checks
//! POST /api/checkout/calculate    - Shipping and tax estimate
//! GET  /api/orders/{orderId}      - Order detail
//! GET  /api/orders/user/{userId}  - A user's orders (?limit=10&status=)
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopfast_core::{OrderId, OrderStatus, PaymentMethod, Price, UserId};

use super::leading_int;
use crate::error::{ApiJson, AppError, Result};
use crate::models::Order;
use crate::services::checkout::{
    Breakdown, CheckoutRequest, ESTIMATED_DELIVERY, TotalsRequest, ValidateRequest,
};
use crate::state::AppState;

/// Default number of orders returned per user.
const DEFAULT_ORDER_LIMIT: i64 = 10;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/checkout", post(checkout))
        .route("/api/checkout/validate", post(validate))
        .route("/api/checkout/calculate", post(calculate))
        .route("/api/orders/{order_id}", get(show_order))
        .route("/api/orders/user/{user_id}", get(user_orders))
}

/// Order fields echoed back by a successful checkout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Price,
    pub status: OrderStatus,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            user_id: order.user_id.clone(),
            total: order.total,
            status: order.status,
            item_count: order.items.len(),
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub message: &'static str,
    pub order: OrderSummary,
    pub payment_method: PaymentMethod,
    pub estimated_delivery: &'static str,
    pub processing_time: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub message: &'static str,
    pub valid: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsResponse {
    pub message: &'static str,
    pub breakdown: Breakdown,
    pub shipping_method: String,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub message: &'static str,
    pub order: Order,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    pub limit: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderFilters {
    pub status: Option<String>,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub message: &'static str,
    pub orders: Vec<Order>,
    pub total: usize,
    pub user_id: UserId,
    pub filters: OrderFilters,
}

/// Place an order from everything in the user's cart.
///
/// # Errors
///
/// Returns 400 for missing fields, an empty cart or an unknown payment
/// method, 401 when the credentials do not resolve to `userId`, and 500 if
/// the order could not be created.
#[instrument(skip(state, body))]
pub async fn checkout(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let receipt = state.checkout().process_checkout(body).await?;

    Ok(Json(CheckoutResponse {
        message: "Order created successfully",
        order: OrderSummary::from(&receipt.order),
        payment_method: receipt.payment_method,
        estimated_delivery: ESTIMATED_DELIVERY,
        processing_time: format!("{}ms", receipt.processing_time.as_millis()),
    }))
}

/// Run every checkout check and report all failures at once.
///
/// # Errors
///
/// Returns 400 with the list of failed checks.
#[instrument(skip(state, body))]
pub async fn validate(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ValidateRequest>,
) -> Result<Json<ValidateResponse>> {
    state
        .checkout()
        .validate_checkout(&body)
        .map_err(AppError::Validation)?;

    Ok(Json(ValidateResponse {
        message: "Checkout validation passed",
        valid: true,
    }))
}

/// Rough shipping and tax estimate for the user's cart.
///
/// # Errors
///
/// Returns 400 without a user id.
#[instrument(skip(state, body))]
pub async fn calculate(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TotalsRequest>,
) -> Result<Json<TotalsResponse>> {
    let estimate = state.checkout().calculate_totals(body).await?;

    Ok(Json(TotalsResponse {
        message: "Totals calculated successfully",
        breakdown: estimate.breakdown,
        shipping_method: estimate.shipping_method,
    }))
}

/// Full order, including the item snapshot.
///
/// # Errors
///
/// Returns 404 if the order does not exist.
#[instrument(skip(state))]
pub async fn show_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>> {
    let order = state
        .orders()
        .get_order(&OrderId::new(order_id))
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(Json(OrderResponse {
        message: "Order retrieved successfully",
        order,
    }))
}

/// A user's orders in creation order.
///
/// `status` filters by exact wire name. `limit` defaults to 10 and is read
/// from its leading digits; zero, negative or non-numeric values disable it.
#[instrument(skip(state))]
pub async fn user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<OrderListParams>,
) -> Json<OrderListResponse> {
    let user_id = UserId::new(user_id);
    let status = params.status.filter(|s| !s.is_empty());
    let limit = params
        .limit
        .map_or(DEFAULT_ORDER_LIMIT, |l| leading_int(&l).unwrap_or(0));

    let mut orders: Vec<Order> = state
        .orders()
        .orders_for_user(&user_id)
        .into_iter()
        .filter(|o| status.as_deref().is_none_or(|s| o.status.as_str() == s))
        .collect();
    if let Ok(limit) = usize::try_from(limit)
        && limit > 0
    {
        orders.truncate(limit);
    }

    Json(OrderListResponse {
        message: "Orders retrieved successfully",
        total: orders.len(),
        orders,
        user_id,
        filters: OrderFilters { status, limit },
    })
}
