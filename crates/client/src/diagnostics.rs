//! Reporting sink for unexpected gateway failures.

use std::fmt;

use crate::api::GatewayError;

/// Receives every server-side or unexpected failure exactly once.
///
/// Client rejections and backend-unavailable conditions never reach it.
pub trait Diagnostics: Send + Sync + fmt::Debug {
    fn report(&self, error: &GatewayError, endpoint: &str);
}

/// Emits one `error`-level tracing event per report.
///
/// With the Sentry tracing layer installed this becomes one Sentry event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, error: &GatewayError, endpoint: &str) {
        tracing::error!(endpoint = %endpoint, error = %error, "API request failed");
    }
}
