//! Common test utilities for in-process API testing.
//!
//! The fixture builds the real router over a fresh store. The progress engine
//! is left stopped so tests advance it deterministically with `tick`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use orator_core::{Config, EngineConfig, ServerConfig};
use orator_server::state::AppState;

/// Test fixture driving the router with `oneshot`.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_ticket_creation() {
///     let fixture = TestFixture::new();
///     let response = fixture.post("/api/ticket/new").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared state behind the router, for ticking the engine
    pub state: Arc<AppState>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default configuration.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Create a test fixture with custom configuration.
    pub fn with_config(test_config: TestConfig) -> Self {
        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
                max_upload_bytes: test_config.max_upload_bytes,
            },
            engine: EngineConfig {
                enabled: false,
                tick_interval_ms: 10,
                progress_step: test_config.progress_step,
            },
        };

        let state = Arc::new(AppState::from_config(config).expect("builtin catalog"));
        let router = orator_server::api::create_router(Arc::clone(&state));

        Self { router, state }
    }

    /// Advance the progress engine `n` times.
    pub fn tick(&self, n: u64) {
        for _ in 0..n {
            self.state.engine().tick();
        }
    }

    /// Ticks needed to complete an analysis from zero.
    pub fn ticks_to_complete(&self) -> u64 {
        self.state.engine().config().ticks_to_complete()
    }

    /// Create a ticket through the API and return its id.
    pub async fn new_ticket(&self) -> String {
        let response = self.post("/api/ticket/new").await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["ticket-id"]
            .as_str()
            .expect("ticket-id missing")
            .to_string()
    }

    /// Create a ticket and upload a small video to it.
    pub async fn ticket_with_video(&self) -> String {
        let id = self.new_ticket().await;
        let response = self
            .post_bytes(&format!("/api/ticket/video?ticket-id={}", id), vec![0u8; 64])
            .await;
        assert_eq!(response.status, StatusCode::OK);
        id
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, Body::empty()).await
    }

    /// Send a POST request with an empty body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path, Body::empty()).await
    }

    /// Send a POST request with a raw binary body.
    pub async fn post_bytes(&self, path: &str, bytes: Vec<u8>) -> TestResponse {
        self.request("POST", path, Body::from(bytes)).await
    }

    /// Send a GET request and return the raw text body.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).into_owned())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Body) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(body)
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub max_upload_bytes: usize,
    pub progress_step: f64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 1024 * 1024,
            progress_step: 0.25,
        }
    }
}

impl TestConfig {
    /// Create config with a small upload limit.
    pub fn with_upload_limit(max_upload_bytes: usize) -> Self {
        Self {
            max_upload_bytes,
            ..Default::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
