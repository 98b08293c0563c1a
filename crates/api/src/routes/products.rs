//! Catalog handlers.
//!
//! ```text
//! GET /api/products                      - List or search (?query=&category=&limit=20)
//! GET /api/products/search               - Search with price and rating filters
//! GET /api/products/featured             - Top-rated products (slow query)
//! GET /api/products/category/{category}  - Exact category listing
//! GET /api/products/{id}                 - Product detail
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use shopfast_core::ProductId;

use super::leading_int;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Default page size for the product listing.
const DEFAULT_LIMIT: i64 = 20;

/// Minimum rating for a featured product.
const FEATURED_MIN_RATING: f64 = 4.5;

/// Number of featured products returned.
const FEATURED_COUNT: usize = 6;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(index))
        .route("/api/products/search", get(search))
        .route("/api/products/featured", get(featured))
        .route("/api/products/category/{category}", get(by_category))
        .route("/api/products/{id}", get(show))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub query: Option<String>,
    pub category: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_rating: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub message: String,
    pub products: Vec<Product>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub query: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_rating: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub message: &'static str,
    pub products: Vec<Product>,
    pub total: usize,
    pub filters: SearchFilters,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub message: String,
    pub product: Product,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// List products, searching when a query or category is given.
///
/// `limit` defaults to 20 and is read from its leading digits; zero,
/// negative or non-numeric values disable it.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ProductListResponse> {
    let query = non_empty(params.query);
    let category = non_empty(params.category);
    let limit = params
        .limit
        .map_or(Some(DEFAULT_LIMIT), |l| leading_int(&l))
        .and_then(|l| usize::try_from(l).ok())
        .filter(|&l| l > 0);

    let mut products = {
        let stores = state.db().read();
        if query.is_some() || category.is_some() {
            stores
                .catalog
                .search(query.as_deref(), category.as_deref())
        } else {
            stores.catalog.all()
        }
    };
    if let Some(limit) = limit {
        products.truncate(limit);
    }

    Json(ProductListResponse {
        message: "Products retrieved successfully".to_string(),
        total: products.len(),
        products,
        query: Some(query),
        category: Some(category),
    })
}

/// Search with optional inclusive price and rating bounds.
///
/// Bounds that do not parse as numbers are ignored.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let filters = SearchFilters {
        query: non_empty(params.q),
        category: non_empty(params.category),
        min_price: non_empty(params.min_price),
        max_price: non_empty(params.max_price),
        min_rating: non_empty(params.min_rating),
    };

    let min_price = parse_decimal(filters.min_price.as_deref());
    let max_price = parse_decimal(filters.max_price.as_deref());
    let min_rating = filters
        .min_rating
        .as_deref()
        .and_then(|r| r.trim().parse::<f64>().ok());

    let products: Vec<Product> = state
        .db()
        .read()
        .catalog
        .search(filters.query.as_deref(), filters.category.as_deref())
        .into_iter()
        .filter(|p| min_price.is_none_or(|min| p.price.amount() >= min))
        .filter(|p| max_price.is_none_or(|max| p.price.amount() <= max))
        .filter(|p| min_rating.is_none_or(|min| p.rating >= min))
        .collect();

    Json(SearchResponse {
        message: "Search completed",
        total: products.len(),
        products,
        filters,
    })
}

fn parse_decimal(raw: Option<&str>) -> Option<Decimal> {
    raw.and_then(|s| s.trim().parse::<Decimal>().ok())
}

/// The top-rated products, after a simulated slow query.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Json<ProductListResponse> {
    let waited = state.timing().featured.wait().await;
    debug!(waited_ms = waited.as_millis(), "Featured query finished");

    let products: Vec<Product> = state
        .db()
        .read()
        .catalog
        .all()
        .into_iter()
        .filter(|p| p.rating >= FEATURED_MIN_RATING)
        .take(FEATURED_COUNT)
        .collect();

    Json(ProductListResponse {
        message: "Featured products retrieved".to_string(),
        total: products.len(),
        products,
        query: None,
        category: None,
    })
}

/// Products whose category matches exactly.
#[instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<ProductListResponse> {
    let products = state.db().read().catalog.by_category(&category);

    Json(ProductListResponse {
        message: format!("Products in category: {category}"),
        total: products.len(),
        products,
        query: None,
        category: Some(Some(category)),
    })
}

/// Product detail.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    let product = state
        .db()
        .read()
        .catalog
        .get_by_id(&ProductId::new(id.as_str()))
        .cloned()
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductResponse {
        message: format!("Product with ID {id}"),
        product,
    }))
}
