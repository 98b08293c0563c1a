//! Response timing.
//!
//! Clients read the handler's wall-clock duration from a `responseTime`
//! field (`"<n>ms"`) in every JSON object body, success or error. The same
//! value goes out in the `x-response-time` header for non-JSON responses.

use std::time::Instant;

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::warn;

/// Header carrying the handler duration.
pub const RESPONSE_TIME_HEADER: &str = "x-response-time";

/// Upper bound on a body we are willing to rewrite.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Stamp the response with how long the handler took.
pub async fn response_time_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = format!("{}ms", started.elapsed().as_millis());

    let (mut parts, body) = response.into_parts();
    if let Ok(value) = HeaderValue::from_str(&elapsed) {
        parts.headers.insert(RESPONSE_TIME_HEADER, value);
    }

    let is_json = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !is_json {
        return Response::from_parts(parts, body);
    }

    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Could not buffer response body");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let body = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(mut map)) => {
            map.insert("responseTime".to_string(), Value::String(elapsed));
            match serde_json::to_vec(&map) {
                Ok(rewritten) => {
                    parts.headers.remove(header::CONTENT_LENGTH);
                    Body::from(rewritten)
                }
                Err(_) => Body::from(bytes),
            }
        }
        _ => Body::from(bytes),
    };

    Response::from_parts(parts, body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Json, Router, http::StatusCode, middleware, routing::get};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/json", get(|| async { Json(json!({"message": "ok"})) }))
            .route(
                "/error",
                get(|| async { (StatusCode::NOT_FOUND, Json(json!({"error": "nope"}))) }),
            )
            .route("/text", get(|| async { "plain" }))
            .layer(middleware::from_fn(response_time_middleware))
    }

    async fn call(uri: &str) -> (Response, Vec<u8>) {
        let response = app()
            .oneshot(axum::http::Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes().to_vec();
        (Response::from_parts(parts, Body::empty()), bytes)
    }

    #[tokio::test]
    async fn test_json_bodies_get_response_time() {
        for uri in ["/json", "/error"] {
            let (response, bytes) = call(uri).await;
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            let stamped = body["responseTime"].as_str().unwrap();
            assert!(stamped.ends_with("ms"));
            assert!(response.headers().contains_key(RESPONSE_TIME_HEADER));
        }
    }

    #[tokio::test]
    async fn test_plain_bodies_untouched() {
        let (response, bytes) = call("/text").await;
        assert_eq!(bytes, b"plain");
        assert!(response.headers().contains_key(RESPONSE_TIME_HEADER));
    }
}
