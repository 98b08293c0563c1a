//! End-to-end tests for the ShopFast API.
//!
//! Each test boots its own server on an ephemeral loopback port with fresh
//! seed data, so tests never share state and can run in parallel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfast-integration-tests
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use shopfast_api::{AppState, ShopFastConfig, app};

/// Confirmation delay used by test servers.
pub const CONFIRMATION_DELAY: Duration = Duration::from_millis(200);

/// A running API server bound to `127.0.0.1:0`.
pub struct TestServer {
    addr: SocketAddr,
    client: Client,
    state: AppState,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with no simulated latency.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        Self::start_with(ShopFastConfig::for_tests(CONFIRMATION_DELAY)).await
    }

    /// Start a server with the given configuration. Host and port are
    /// overridden with an ephemeral loopback address.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn start_with(config: ShopFastConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state = AppState::new(config);
        let router = app(state.clone());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            addr,
            client: Client::new(),
            state,
            handle,
        }
    }

    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Shared state, for inspecting stores directly.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    #[allow(clippy::unwrap_used)]
    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    #[allow(clippy::unwrap_used)]
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    #[allow(clippy::unwrap_used)]
    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    #[allow(clippy::unwrap_used)]
    pub async fn delete(&self, path: &str) -> Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }

    /// Stop the confirmation scheduler and the server.
    pub async fn stop(self) {
        self.state.orders().shutdown().await;
        self.handle.abort();
    }
}

/// Decode a response into its status code and JSON body.
///
/// # Panics
///
/// Panics if the body is not JSON.
#[allow(clippy::unwrap_used)]
pub async fn json(response: Response) -> (u16, Value) {
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}
