//! Integration test support for Vitrina.
//!
//! Tests run the real [`ApiClient`] against [`StubBackend`], an in-process
//! axum server on an ephemeral port that answers with canned responses and
//! records every request it sees.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrina-integration-tests
//! ```
//!
//! [`ApiClient`]: vitrina_client::ApiClient

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use vitrina_client::{ApiClient, Diagnostics, GatewayError, MemoryStore};

/// Path prefix the stub serves the API under.
pub const API_PREFIX: &str = "/api";

/// One request received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path below [`API_PREFIX`], e.g. `/products/p1`.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: StatusCode,
    body: String,
}

#[derive(Debug, Default)]
struct StubState {
    routes: Mutex<HashMap<(Method, String), CannedResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process backend answering with canned responses.
///
/// Unregistered routes answer 404 with an empty body.
pub struct StubBackend {
    addr: SocketAddr,
    state: Arc<StubState>,
    server: JoinHandle<()>,
}

impl StubBackend {
    /// Bind to an ephemeral port on localhost and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("Stub backend has no address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL of the stub API, e.g. `http://127.0.0.1:41234/api`.
    ///
    /// # Panics
    ///
    /// Never in practice; the address is always a valid URL.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn api_url(&self) -> Url {
        Url::parse(&format!("http://{}{API_PREFIX}", self.addr)).expect("Stub URL is valid")
    }

    /// Answer `method path` with `status` and a JSON body.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: &Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    /// Answer `method path` with `status` and a verbatim body.
    ///
    /// # Panics
    ///
    /// Panics if `method` or `status` is not valid HTTP.
    #[allow(clippy::expect_used)]
    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        let method = Method::from_bytes(method.as_bytes()).expect("Invalid HTTP method");
        let status = StatusCode::from_u16(status).expect("Invalid HTTP status");
        self.state
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                (method, path.to_string()),
                CannedResponse {
                    status,
                    body: body.to_string(),
                },
            );
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }

    /// A client for this stub with an in-memory store and recording
    /// diagnostics.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn client(&self) -> (ApiClient, Arc<RecordingDiagnostics>) {
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let client = ApiClient::builder(self.api_url())
            .store(Arc::new(MemoryStore::new()))
            .diagnostics(Arc::clone(&diagnostics) as Arc<dyn Diagnostics>)
            .build()
            .expect("Failed to build client");
        (client, diagnostics)
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or_else(|| uri.path())
        .to_string();
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_owned),
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
            body: serde_json::from_slice(&body).ok(),
        });

    let canned = state
        .routes
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&(method, path))
        .cloned();

    match canned {
        Some(canned) => (
            canned.status,
            [(header::CONTENT_TYPE, "application/json")],
            canned.body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Diagnostics sink that remembers every report.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingDiagnostics {
    /// `(endpoint, error message)` for every report, oldest first.
    #[must_use]
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, error: &GatewayError, endpoint: &str) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((endpoint.to_string(), error.to_string()));
    }
}

/// URL of an API nobody is listening on.
///
/// # Panics
///
/// Panics if no local port can be reserved.
#[allow(clippy::expect_used)]
pub async fn unreachable_api_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to reserve a port");
    let addr = listener.local_addr().expect("Listener has no address");
    drop(listener);
    Url::parse(&format!("http://{addr}{API_PREFIX}")).expect("URL is valid")
}
