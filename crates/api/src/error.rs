//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the response is written; everything renders as
//! a JSON body with an `error` field.

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use shopfast_core::PaymentMethod;

use crate::services::{AuthError, CheckoutError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Checkout orchestration failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Account operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found. Carries the client-facing message.
    #[error("{0}")]
    NotFound(String),

    /// Bad request from client. Carries the client-facing message.
    #[error("{0}")]
    BadRequest(String),

    /// Not enough stock to put the requested quantity in a cart.
    #[error("Insufficient stock. Available: {available}")]
    InsufficientStock { available: u32 },

    /// One or more validation checks failed.
    #[error("Validation failed")]
    Validation(Vec<String>),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Checkout(err) => match err {
                CheckoutError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
                CheckoutError::OrderCreationFailed => StatusCode::INTERNAL_SERVER_ERROR,
                CheckoutError::MissingFields
                | CheckoutError::EmptyCart
                | CheckoutError::InvalidPaymentMethod
                | CheckoutError::UserIdRequired => StatusCode::BAD_REQUEST,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::InsufficientStock { .. } | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::Checkout(CheckoutError::InvalidPaymentMethod) => json!({
                "error": CheckoutError::InvalidPaymentMethod.to_string(),
                "validMethods": PaymentMethod::names(),
            }),
            Self::Checkout(err) => json!({ "error": err.to_string() }),
            Self::Auth(err) => {
                let message = match err {
                    AuthError::InvalidCredentials => "Invalid credentials",
                    AuthError::UserNotFound => "User not found",
                    AuthError::UserAlreadyExists => "User with this email already exists",
                    AuthError::InvalidEmail(_) => "Invalid email address",
                };
                json!({ "error": message })
            }
            Self::Validation(errors) => json!({
                "message": "Validation failed",
                "errors": errors,
            }),
            Self::NotFound(_) | Self::BadRequest(_) | Self::InsufficientStock { .. } => {
                json!({ "error": self.to_string() })
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON body extractor whose rejections render as [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::NotFound("Product not found".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Auth(AuthError::UserAlreadyExists).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Checkout(CheckoutError::AuthenticationFailed).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Checkout(CheckoutError::OrderCreationFailed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::InsufficientStock { available: 3 }.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_invalid_payment_lists_methods() {
        let (status, body) = render(AppError::Checkout(CheckoutError::InvalidPaymentMethod)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid payment method");
        assert_eq!(
            body["validMethods"],
            json!(["credit_card", "debit_card", "paypal", "pix"])
        );
    }

    #[tokio::test]
    async fn test_validation_body_has_no_valid_flag() {
        let (_, body) = render(AppError::Validation(vec!["Cart is empty".to_string()])).await;
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"], json!(["Cart is empty"]));
        assert!(body.get("valid").is_none());
    }

    #[tokio::test]
    async fn test_order_creation_failure_is_server_error() {
        let (status, body) = render(AppError::Checkout(CheckoutError::OrderCreationFailed)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], CheckoutError::OrderCreationFailed.to_string());
    }

    #[tokio::test]
    async fn test_stock_message() {
        let (_, body) = render(AppError::InsufficientStock { available: 15 }).await;
        assert_eq!(body["error"], "Insufficient stock. Available: 15");
    }
}
