//! Cart handlers.
//!
//! ```text
//! POST   /api/cart                          - Add a product (merges into an existing line)
//! GET    /api/cart/{userId}                 - Cart with live prices and subtotals
//! DELETE /api/cart/{userId}/clear           - Empty the cart
//! DELETE /api/cart/{userId}/{productId}     - Remove one line
//! PUT    /api/cart/{userId}/{productId}     - Set a line's quantity
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use shopfast_core::{Price, ProductId, UserId};

use crate::db::QuantityUpdate;
use crate::error::{ApiJson, AppError, Result};
use crate::models::{CartItem, Product};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cart", post(add))
        .route("/api/cart/{user_id}", get(show))
        .route("/api/cart/{user_id}/clear", delete(clear))
        .route(
            "/api/cart/{user_id}/{product_id}",
            delete(remove).put(update),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: Option<i64>,
}

/// Product fields shown next to a cart line.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ProductSummary {
    fn of(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            category: None,
        }
    }

    fn with_category(product: &Product) -> Self {
        Self {
            category: Some(product.category.clone()),
            ..Self::of(product)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartResponse {
    pub message: &'static str,
    pub cart_item: CartItem,
    pub product: ProductSummary,
}

/// A cart line priced at the current catalog price.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Option<ProductSummary>,
    pub subtotal: Price,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub message: &'static str,
    pub cart: Vec<CartLine>,
    pub item_count: usize,
    pub total: Price,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_item: Option<CartItem>,
}

fn path_ids(user_id: String, product_id: String) -> (UserId, ProductId) {
    (UserId::new(user_id), ProductId::new(product_id))
}

/// Add units of a product to a cart.
///
/// The stock check compares the requested quantity alone against current
/// stock; units already in the cart are not counted.
///
/// # Errors
///
/// Returns 400 for missing ids, a non-positive quantity or low stock, and
/// 404 for an unknown product.
#[instrument(skip(state, body))]
pub async fn add(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AddToCartRequest>,
) -> Result<Json<AddToCartResponse>> {
    let (Some(user_id), Some(product_id)) = (
        body.user_id.filter(|id| !id.is_empty()),
        body.product_id.filter(|id| !id.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "User ID and Product ID are required".to_string(),
        ));
    };
    let quantity = u32::try_from(body.quantity)
        .ok()
        .filter(|&q| q > 0)
        .ok_or_else(|| AppError::BadRequest("Quantity must be a positive integer".to_string()))?;
    let (user_id, product_id) = path_ids(user_id, product_id);

    let mut guard = state.db().write();
    let stores = &mut *guard;

    let product = stores
        .catalog
        .get_by_id(&product_id)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    if product.stock < quantity {
        return Err(AppError::InsufficientStock {
            available: product.stock,
        });
    }
    let summary = ProductSummary::of(product);

    let cart_item = stores
        .carts
        .add(&stores.catalog, &user_id, &product_id, quantity)
        .ok_or_else(|| AppError::BadRequest("Failed to add item to cart".to_string()))?;
    debug!(quantity = cart_item.quantity, "Cart line updated");

    Ok(Json(AddToCartResponse {
        message: "Item added to cart successfully",
        cart_item,
        product: summary,
    }))
}

/// A user's cart priced at current catalog prices.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(user_id): Path<String>) -> Json<CartResponse> {
    let user_id = UserId::new(user_id);
    let stores = state.db().read();

    let cart: Vec<CartLine> = stores
        .carts
        .by_user(&user_id)
        .into_iter()
        .map(|item| {
            let product = stores.catalog.get_by_id(&item.product_id);
            CartLine {
                subtotal: product.map_or(Price::ZERO, |p| p.price.times(item.quantity)),
                product: product.map(ProductSummary::with_category),
                item,
            }
        })
        .collect();
    let total = cart.iter().map(|line| line.subtotal).sum();

    Json(CartResponse {
        message: "Cart retrieved successfully",
        item_count: cart.len(),
        cart,
        total,
    })
}

/// Remove one line from a cart.
///
/// # Errors
///
/// Returns 404 if the cart has no such line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path((user_id, product_id)): Path<(String, String)>,
) -> Result<Json<CartItemResponse>> {
    let (user_id, product_id) = path_ids(user_id, product_id);
    if !state.db().write().carts.remove(&user_id, &product_id) {
        return Err(AppError::NotFound("Item not found in cart".to_string()));
    }
    Ok(Json(CartItemResponse {
        message: "Item removed from cart successfully",
        cart_item: None,
    }))
}

/// Empty a cart. Clearing an empty cart succeeds.
#[instrument(skip(state))]
pub async fn clear(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<CartItemResponse> {
    state.db().write().carts.clear(&UserId::new(user_id));
    Json(CartItemResponse {
        message: "Cart cleared successfully",
        cart_item: None,
    })
}

/// Set a line's quantity; zero or less removes it.
///
/// # Errors
///
/// Returns 400 without a quantity, or when the new quantity cannot be added
/// back. In the latter case the old line is gone.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path((user_id, product_id)): Path<(String, String)>,
    ApiJson(body): ApiJson<UpdateQuantityRequest>,
) -> Result<Json<CartItemResponse>> {
    let quantity = body
        .quantity
        .ok_or_else(|| AppError::BadRequest("Quantity is required".to_string()))?;
    let (user_id, product_id) = path_ids(user_id, product_id);

    let mut guard = state.db().write();
    let stores = &mut *guard;
    let outcome = stores
        .carts
        .update_quantity(&stores.catalog, &user_id, &product_id, quantity);

    match outcome {
        QuantityUpdate::Removed { existed } => Ok(Json(CartItemResponse {
            message: if existed {
                "Item removed from cart"
            } else {
                "Item not found in cart"
            },
            cart_item: None,
        })),
        QuantityUpdate::Updated(item) => Ok(Json(CartItemResponse {
            message: "Cart item updated successfully",
            cart_item: Some(item),
        })),
        QuantityUpdate::Rejected => Err(AppError::BadRequest(
            "Failed to update cart item".to_string(),
        )),
    }
}
