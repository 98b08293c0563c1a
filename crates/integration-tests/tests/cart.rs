//! Cart merge, update and clear semantics over HTTP.

use serde_json::json;
use shopfast_integration_tests::{TestServer, json};

#[tokio::test]
async fn test_adds_merge_without_reserving_stock() {
    let server = TestServer::start().await;

    // 15 in stock; each add passes on its own, together they exceed it
    for _ in 0..2 {
        let (status, _) = json(
            server
                .post(
                    "/api/cart",
                    &json!({"userId": "3", "productId": "4", "quantity": 10}),
                )
                .await,
        )
        .await;
        assert_eq!(status, 200);
    }

    let (_, body) = json(server.get("/api/cart/3").await).await;
    assert_eq!(body["itemCount"], 1);
    assert_eq!(body["cart"][0]["quantity"], 20);
    assert_eq!(body["cart"][0]["product"]["category"], "camera");

    server.stop().await;
}

#[tokio::test]
async fn test_update_over_stock_drops_line() {
    let server = TestServer::start().await;
    server
        .post(
            "/api/cart",
            &json!({"userId": "1", "productId": "4", "quantity": 1}),
        )
        .await;

    let (status, body) = json(server.put("/api/cart/1/4", &json!({"quantity": 99})).await).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Failed to update cart item");

    let (_, body) = json(server.get("/api/cart/1").await).await;
    assert_eq!(body["itemCount"], 0);

    server.stop().await;
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let server = TestServer::start().await;
    server
        .post("/api/cart", &json!({"userId": "2", "productId": "6"}))
        .await;

    for _ in 0..2 {
        let (status, body) = json(server.delete("/api/cart/2/clear").await).await;
        assert_eq!(status, 200);
        assert_eq!(body["message"], "Cart cleared successfully");
    }
    let (_, body) = json(server.get("/api/cart/2").await).await;
    assert_eq!(body["total"], 0.0);

    server.stop().await;
}
