//! Account handlers.
//!
//! ```text
//! GET    /api/users            - List users (?name=&age=)
//! POST   /api/users            - Register a user
//! GET    /api/users/{id}       - Fetch one user
//! PUT    /api/users/{id}       - Update name and age
//! DELETE /api/users/{id}       - Delete a user
//! POST   /api/auth             - Sign in
//! POST   /api/auth/logout      - Sign out
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopfast_core::UserId;

use crate::error::{ApiJson, AppError, Result};
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list).post(create))
        .route("/api/users/{id}", get(show).put(update).delete(remove))
        .route("/api/auth", post(login))
        .route("/api/auth/logout", post(logout))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub age: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub message: &'static str,
    pub users: Vec<User>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List users, optionally filtered by name substring and exact age.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<UsersResponse> {
    let name = params
        .name
        .filter(|n| !n.is_empty())
        .map(|n| n.to_lowercase());
    let age = params.age.and_then(|a| a.trim().parse::<u32>().ok());

    let users: Vec<User> = state
        .db()
        .read()
        .accounts
        .all()
        .into_iter()
        .filter(|u| {
            name.as_deref()
                .is_none_or(|n| u.name.to_lowercase().contains(n))
        })
        .filter(|u| age.is_none_or(|a| u.age == a))
        .collect();

    Json(UsersResponse {
        message: "Users retrieved successfully",
        total: users.len(),
        users,
    })
}

/// Fetch one user.
///
/// # Errors
///
/// Returns 404 if the user does not exist.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<UserResponse>> {
    let user = state
        .db()
        .read()
        .accounts
        .get_by_id(&UserId::new(id))
        .cloned()
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        message: format!("User with ID {}", user.id),
        user,
    }))
}

/// Register a user. Emails must be unique.
///
/// # Errors
///
/// Returns 400 for missing fields or a malformed email, 409 for a taken email.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let (Some(name), Some(email), Some(age)) = (
        body.name.filter(|n| !n.is_empty()),
        body.email.filter(|e| !e.is_empty()),
        body.age,
    ) else {
        return Err(AppError::BadRequest(
            "Name, email and age are required".to_string(),
        ));
    };

    let user = AuthService::new(state.db()).register(name, &email, age)?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "User created".to_string(),
            user,
        }),
    ))
}

/// Update a user's name and age. Omitted fields keep their value.
///
/// # Errors
///
/// Returns 404 if the user does not exist.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    let id = UserId::new(id);
    let not_found = || AppError::NotFound("User not found".to_string());

    let mut stores = state.db().write();
    let current = stores.accounts.get_by_id(&id).ok_or_else(not_found)?;
    let name = body
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| current.name.clone());
    let age = body.age.unwrap_or(current.age);
    let user = stores.accounts.update(&id, name, age).ok_or_else(not_found)?;

    Ok(Json(UserResponse {
        message: format!("User with ID {id} updated"),
        user,
    }))
}

/// Delete a user.
///
/// # Errors
///
/// Returns 404 if the user does not exist.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = UserId::new(id);
    if !state.db().write().accounts.delete(&id) {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(Json(MessageResponse {
        message: format!("User with ID {id} deleted"),
    }))
}

/// Sign in with the placeholder credential check.
///
/// # Errors
///
/// Returns 401 when the check fails.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<UserResponse>> {
    let user = AuthService::new(state.db()).authenticate(&body.email, &body.password)?;
    Ok(Json(UserResponse {
        message: "Authentication successful".to_string(),
        user,
    }))
}

/// Clear the authenticated flag.
///
/// # Errors
///
/// Returns 400 without a user id and 404 for an unknown user.
#[instrument(skip(state, body))]
pub async fn logout(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LogoutRequest>,
) -> Result<Json<UserResponse>> {
    let user_id = body
        .user_id
        .filter(|id| !id.is_empty())
        .map(UserId::new)
        .ok_or_else(|| AppError::BadRequest("User ID is required".to_string()))?;

    let user = AuthService::new(state.db()).logout(&user_id)?;
    Ok(Json(UserResponse {
        message: "Logged out".to_string(),
        user,
    }))
}
