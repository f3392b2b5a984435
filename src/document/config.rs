//! Settings for [`DocumentClient`](super::DocumentClient).

use crate::rate_limiter::RateLimiterConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upstream "create document" endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";

/// Per-request timeout applied by the HTTP client.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Client configuration.
///
/// Deserializes from a host application's config file; every field is
/// optional there.
///
/// ```rust
/// use window_gate::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(
///     r#"{ "rate": { "limit": 5, "interval_ms": 60000 } }"#,
/// ).unwrap();
/// assert_eq!(config.rate.limit, 5);
/// assert!(config.endpoint.starts_with("https://"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// URL the document is POSTed to.
    pub endpoint: String,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Budget for submissions.
    pub rate: RateLimiterConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            rate: RateLimiterConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Default endpoint and timeout with the given submission budget.
    pub fn new(rate: RateLimiterConfig) -> Self {
        Self {
            rate,
            ..Self::default()
        }
    }

    /// Overrides the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
