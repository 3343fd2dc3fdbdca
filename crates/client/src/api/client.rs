//! HTTP transport and response classification shared by every operation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::{
    GatewayError, Outcome, Rejection, UnavailableReason, extract_error_message, sanitize_message,
};
use crate::config::ClientConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::normalize::{Normalize, NormalizeError, normalize_list};
use crate::session::Session;
use crate::store::{ClientStore, FileStore, MemoryStore};

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront backend.
///
/// Cheap to clone; clones share the HTTP connection pool, the session, and
/// the diagnostics sink.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    api_url: Url,
    session: Session,
    diagnostics: Arc<dyn Diagnostics>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_url", &self.inner.api_url.as_str())
            .field("authenticated", &self.inner.session.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiClient`].
#[derive(Debug)]
pub struct ApiClientBuilder {
    api_url: Url,
    store: Option<Arc<dyn ClientStore>>,
    diagnostics: Option<Arc<dyn Diagnostics>>,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    /// Client-local store for the token, role, and cart. Defaults to a
    /// [`MemoryStore`].
    #[must_use]
    pub fn store(mut self, store: Arc<dyn ClientStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sink for server-side failures. Defaults to [`TracingDiagnostics`].
    #[must_use]
    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Setup`] if the base URL cannot carry a path or
    /// the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ApiClient, GatewayError> {
        if self.api_url.cannot_be_a_base() {
            return Err(GatewayError::Setup(format!(
                "API URL cannot be used as a base: {}",
                self.api_url
            )));
        }

        let mut http = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http
            .build()
            .map_err(|e| GatewayError::Setup(e.to_string()))?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Arc::new(TracingDiagnostics));

        Ok(ApiClient {
            inner: Arc::new(ApiClientInner {
                http,
                api_url: self.api_url,
                session: Session::new(store),
                diagnostics,
            }),
        })
    }
}

impl ApiClient {
    /// Start building a client for the API rooted at `api_url`.
    #[must_use]
    pub const fn builder(api_url: Url) -> ApiClientBuilder {
        ApiClientBuilder {
            api_url,
            store: None,
            diagnostics: None,
            timeout: None,
        }
    }

    /// Build a client from loaded configuration, persisting state to
    /// `config.state_path`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Setup`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, GatewayError> {
        Self::builder(config.api_url.clone())
            .store(Arc::new(FileStore::open(&config.state_path)))
            .timeout(config.timeout)
            .build()
    }

    #[must_use]
    pub fn api_url(&self) -> &Url {
        &self.inner.api_url
    }

    /// Token and role state for this client.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Replace or clear the bearer token sent with every request.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] if the token could not be persisted.
    pub fn set_token(&self, token: Option<SecretString>) -> Result<(), GatewayError> {
        self.inner.session.set_token(token)?;
        Ok(())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    /// Whether the signed-in account may use the admin console.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner.session.is_admin()
    }

    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------

    fn endpoint_url(&self, call: &Call<'_>) -> Url {
        let mut url = self.inner.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(call.segments);
        }
        if !call.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&call.query);
        }
        url
    }

    /// Pass a server-side failure to the diagnostics sink, then hand it back.
    fn report(&self, error: GatewayError, endpoint: &str) -> GatewayError {
        self.inner.diagnostics.report(&error, endpoint);
        error
    }

    /// Send one request and classify the response.
    ///
    /// On success yields the decoded body, or `None` for an empty body.
    #[instrument(skip(self, call), fields(method = %call.method, endpoint = %call.label()))]
    async fn dispatch(&self, call: Call<'_>) -> Result<Outcome<Option<Value>>, GatewayError> {
        let endpoint = call.label();
        let url = self.endpoint_url(&call);
        let mut request = self
            .inner
            .http
            .request(call.method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(token) = self.inner.session.token() {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = call.body {
            request = request.json(&body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_error(&e, &endpoint)),
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.transport_error(&e, &endpoint)),
        };

        if status.is_success() {
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Outcome::Ok(None));
            }
            return serde_json::from_slice(&bytes)
                .map(|body| Outcome::Ok(Some(body)))
                .map_err(|e| {
                    self.report(
                        GatewayError::Server {
                            status: Some(status.as_u16()),
                            message: format!("undecodable response body: {e}"),
                        },
                        &endpoint,
                    )
                });
        }

        if status == StatusCode::NOT_FOUND {
            debug!("Endpoint returned 404, treating backend as unavailable");
            return Err(GatewayError::Unavailable(UnavailableReason::NotFound {
                endpoint,
            }));
        }

        let message = sanitize_message(&extract_error_message(status, &bytes));

        if status.is_client_error() {
            debug!(status = %status, message = %message, "Request rejected");
            return Ok(Outcome::Rejected(Rejection {
                message,
                status: status.as_u16(),
            }));
        }

        Err(self.report(
            GatewayError::Server {
                status: Some(status.as_u16()),
                message,
            },
            &endpoint,
        ))
    }

    fn transport_error(&self, error: &reqwest::Error, endpoint: &str) -> GatewayError {
        if error.is_connect() || error.is_timeout() || error.is_request() {
            debug!(error = %error, "Backend not reachable");
            return GatewayError::Unavailable(UnavailableReason::Network(error.to_string()));
        }
        self.report(
            GatewayError::Server {
                status: error.status().map(|s| s.as_u16()),
                message: error.to_string(),
            },
            endpoint,
        )
    }

    /// Send a request whose success body is one entity, built by `build`.
    pub(super) async fn fetch_with<T>(
        &self,
        call: Call<'_>,
        build: impl FnOnce(&Value) -> Result<T, NormalizeError>,
    ) -> Result<Outcome<T>, GatewayError> {
        let endpoint = call.label();
        let body = match self.dispatch(call).await? {
            Outcome::Ok(body) => body.unwrap_or(Value::Null),
            Outcome::Rejected(rejection) => return Ok(Outcome::Rejected(rejection)),
        };
        build(&body)
            .map(Outcome::Ok)
            .map_err(|source| {
                self.report(
                    GatewayError::Normalize {
                        endpoint: endpoint.clone(),
                        source,
                    },
                    &endpoint,
                )
            })
    }

    /// Send a request whose success body is one entity.
    pub(super) async fn fetch_one<T: Normalize>(
        &self,
        call: Call<'_>,
    ) -> Result<Outcome<T>, GatewayError> {
        self.fetch_with(call, T::normalize).await
    }

    /// Send a request whose success body is a collection.
    pub(super) async fn fetch_list<T: Normalize>(
        &self,
        call: Call<'_>,
    ) -> Result<Outcome<Vec<T>>, GatewayError> {
        Ok(self
            .dispatch(call)
            .await?
            .map(|body| normalize_list(&body.unwrap_or(Value::Null))))
    }

    /// Send a request whose success body is ignored.
    pub(super) async fn fetch_unit(&self, call: Call<'_>) -> Result<Outcome<()>, GatewayError> {
        Ok(self.dispatch(call).await?.map(|_| ()))
    }
}

// =============================================================================
// Call
// =============================================================================

/// One request: method, path segments below the API root, query, and body.
pub(super) struct Call<'a> {
    method: Method,
    segments: &'a [&'a str],
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
}

impl<'a> Call<'a> {
    fn new(method: Method, segments: &'a [&'a str]) -> Self {
        Self {
            method,
            segments,
            query: Vec::new(),
            body: None,
        }
    }

    pub(super) fn get(segments: &'a [&'a str]) -> Self {
        Self::new(Method::GET, segments)
    }

    pub(super) fn post(segments: &'a [&'a str]) -> Self {
        Self::new(Method::POST, segments)
    }

    pub(super) fn put(segments: &'a [&'a str]) -> Self {
        Self::new(Method::PUT, segments)
    }

    pub(super) fn patch(segments: &'a [&'a str]) -> Self {
        Self::new(Method::PATCH, segments)
    }

    pub(super) fn delete(segments: &'a [&'a str]) -> Self {
        Self::new(Method::DELETE, segments)
    }

    /// Add a query parameter if `value` is set.
    pub(super) fn query(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.query.push((key, value.to_owned()));
        }
        self
    }

    /// Attach a JSON body.
    pub(super) fn json(mut self, body: &impl Serialize) -> Result<Self, GatewayError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Path used in logs and diagnostics, e.g. `/categories/xyz`.
    fn label(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}
