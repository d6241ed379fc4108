//! Request executor with rate-limit recovery
//!
//! Issues one semantic API call per invocation:
//! - Injects the bearer token, optional client secret and JSON content type
//! - Re-sends the identical request after a fixed delay on 429, up to a
//!   fixed number of retries, then fails with `RateLimitExceeded`
//! - Classifies every other status into success or a structured error
//!
//! The retry counter lives on the stack of the call that owns it, so
//! concurrent calls through a shared executor never share a retry budget.

use super::error_body::decode_error_body;
use super::rate_limit::RateLimiter;
use super::request::RequestSpec;
use super::transport::{HttpRequest, HttpResponse, Transport};
use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::types::Method;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Root of the public API
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Fixed-interval retry policy for 429 responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Pause before each retry
    #[serde(with = "millis", rename = "delay_ms")]
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            delay: Duration::from_secs(1),
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Executes `RequestSpec`s against the API through a `Transport`
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
    api_url: String,
    retry: RetryPolicy,
    throttle: Option<RateLimiter>,
    debug: bool,
}

impl Executor {
    /// Create an executor for the public API root
    pub fn new(transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            api_url: DEFAULT_API_URL.to_string(),
            retry: RetryPolicy::default(),
            throttle: None,
            debug: false,
        }
    }

    /// Point the executor at another API root (e.g. a mock server)
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Pace every attempt through a client-side throttle
    #[must_use]
    pub fn with_throttle(mut self, throttle: RateLimiter) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Log request headers and bodies at debug level
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Resolve a spec into a concrete request
    pub fn build_request(&self, spec: &RequestSpec) -> Result<HttpRequest> {
        let mut url = Url::parse(&self.api_url)?;
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("API URL cannot be a base: {}", self.api_url)))?
            .pop_if_empty()
            .extend(&spec.segments);

        let mut headers = self.credentials.headers();
        headers.push(("Content-Type".to_string(), "application/json".to_string()));

        Ok(HttpRequest {
            method: spec.method,
            url: url.to_string(),
            query: spec.query.clone(),
            headers,
            body: spec.body.clone(),
        })
    }

    /// Send the request, retrying on 429.
    ///
    /// Returns the first non-429 response whatever its status.
    pub async fn send(&self, spec: &RequestSpec) -> Result<HttpResponse> {
        let request = self.build_request(spec)?;
        let max_retries = self.retry.max_retries;

        for retry in 0..=max_retries {
            if retry > 0 {
                warn!(
                    "Rate limited (429), retry {}/{} in {:?}: {} {}",
                    retry, max_retries, self.retry.delay, request.method, request.url
                );
                tokio::time::sleep(self.retry.delay).await;
            }

            if let Some(ref throttle) = self.throttle {
                throttle.wait().await;
            }

            self.trace_request(&request);
            let response = self.transport.send(&request).await?;

            if response.status != STATUS_TOO_MANY_REQUESTS {
                debug!("{} {} -> {}", request.method, request.url, response.status);
                return Ok(response);
            }
        }

        warn!(
            "Rate limit retries exhausted after {} retries: {} {}",
            max_retries, request.method, request.url
        );
        Err(Error::RateLimitExceeded {
            retries: max_retries,
        })
    }

    /// Send and classify; returns the success body.
    ///
    /// DELETE never yields a body.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<Bytes> {
        let response = self.send(spec).await?;
        classify(spec.method, response)
    }

    /// Send, classify and decode the success body
    pub async fn execute_json<T: DeserializeOwned>(&self, spec: &RequestSpec) -> Result<T> {
        let body = self.execute(spec).await?;
        serde_json::from_slice(&body).map_err(|e| Error::decode(e.to_string()))
    }

    /// Send and classify, discarding any body
    pub async fn execute_discard(&self, spec: &RequestSpec) -> Result<()> {
        self.execute(spec).await.map(|_| ())
    }

    fn trace_request(&self, request: &HttpRequest) {
        debug!("call {} {}", request.method, request.url);
        if !self.debug {
            return;
        }
        let headers: Vec<String> = request
            .headers
            .iter()
            .map(|(key, value)| {
                if key.eq_ignore_ascii_case("authorization")
                    || key.eq_ignore_ascii_case(crate::auth::CLIENT_SECRET_HEADER)
                {
                    format!("{key}: <redacted>")
                } else {
                    format!("{key}: {value}")
                }
            })
            .collect();
        let body = request
            .body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default();
        debug!(query = ?request.query, headers = ?headers, body = %body, "request dump");
    }
}

/// Map a final (non-429) response to its outcome
pub(crate) fn classify(method: Method, response: HttpResponse) -> Result<Bytes> {
    if response.is_success() {
        if method == Method::DELETE {
            return Ok(Bytes::new());
        }
        return Ok(response.body);
    }
    Err(Error::from_status(
        response.status,
        decode_error_body(&response.body),
    ))
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("api_url", &self.api_url)
            .field("credentials", &self.credentials)
            .field("retry", &self.retry)
            .field("has_throttle", &self.throttle.is_some())
            .finish_non_exhaustive()
    }
}
