//! Product listing and search over the seeded catalog.

use shopfast_integration_tests::{TestServer, json};

#[tokio::test]
async fn test_listing_defaults_and_search() {
    let server = TestServer::start().await;

    let (status, body) = json(server.get("/api/products").await).await;
    assert_eq!(status, 200);
    assert_eq!(body["total"], 10);

    let (_, body) = json(server.get("/api/products?query=PRO").await).await;
    let names: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"iPhone 15 Pro"));
    assert!(names.contains(&"AirPods Pro"));
    assert_eq!(body["query"], "PRO");

    let (_, body) = json(server.get("/api/products?category=laptop").await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["name"], "MacBook Pro M3");

    let (_, body) = json(server.get("/api/products?limit=0").await).await;
    assert_eq!(body["total"], 10);

    server.stop().await;
}

#[tokio::test]
async fn test_category_and_rating_filters() {
    let server = TestServer::start().await;

    let (_, body) = json(server.get("/api/products/category/camera").await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["category"], "camera");

    let (_, body) = json(server.get("/api/products/search?minRating=4.8").await).await;
    assert!(
        body["products"]
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["rating"].as_f64().unwrap() >= 4.8)
    );
    assert_eq!(body["filters"]["minRating"], "4.8");

    let (_, body) = json(server.get("/api/products/featured").await).await;
    assert_eq!(body["total"], 6);

    server.stop().await;
}
