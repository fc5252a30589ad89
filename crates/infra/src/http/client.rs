use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use scanbridge_domain::constants::{
    is_retryable_status, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TRANSPORT_DELAY_MS,
    DEFAULT_TRANSPORT_MAX_ATTEMPTS,
};
use scanbridge_domain::{RetrySettings, TransportError};
use tracing::{debug, warn};

use crate::errors::HttpErrorExt;

/// Attempt budget and fixed spacing of transport retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts (initial try + retries).
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_TRANSPORT_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_TRANSPORT_DELAY_MS),
        }
    }
}

impl From<RetrySettings> for RetryPolicy {
    fn from(settings: RetrySettings) -> Self {
        Self { max_attempts: settings.max_attempts, delay: settings.delay() }
    }
}

/// HTTP client with built-in retry and timeout support.
///
/// [`HttpClient::send`] retries throttling and gateway statuses
/// (429/502/503/504) and connection failures with a fixed delay.
/// [`HttpClient::send_once`] issues a single attempt and leaves status
/// handling to the caller.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    policy: RetryPolicy,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    /// Build a client from the configured retry budget and request timeout.
    pub fn from_settings(settings: &RetrySettings) -> Result<Self, TransportError> {
        Self::builder()
            .timeout(settings.timeout())
            .retry_policy(RetryPolicy::from(*settings))
            .build()
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// Any response whose status is not retryable is returned as is,
    /// including 4xx and other 5xx codes.
    ///
    /// # Errors
    /// - [`TransportError::RetriesExhausted`] when the last attempt still
    ///   answered with a retryable status
    /// - [`TransportError::Connection`] when the last attempt failed below
    ///   HTTP
    /// - [`TransportError::InvalidRequest`] when the request cannot be built
    ///   or re-sent
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, TransportError> {
        let attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                TransportError::InvalidRequest(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let request = cloned_builder.build().map_err(|err| err.into_transport(attempt))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if !is_retryable_status(status.as_u16()) {
                        return Ok(response);
                    }

                    // Release the connection before the next attempt.
                    let _ = response.bytes().await;

                    if attempt == attempts {
                        warn!(%method, %url, %status, attempts, "retry budget exhausted");
                        return Err(TransportError::RetriesExhausted {
                            status: status.as_u16(),
                            attempts,
                        });
                    }

                    warn!(
                        attempt,
                        %method,
                        %url,
                        %status,
                        delay_ms = self.policy.delay.as_millis() as u64,
                        "retryable status, retrying"
                    );
                    self.sleep_before_retry().await;
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");

                    if attempt < attempts && should_retry_error(&err) {
                        self.sleep_before_retry().await;
                        continue;
                    }

                    return Err(err.into_transport(attempt));
                }
            }
        }

        Err(TransportError::InvalidRequest(
            "http client exhausted retries without producing a result".into(),
        ))
    }

    /// Execute the request exactly once.
    pub async fn send_once(&self, builder: RequestBuilder) -> Result<Response, reqwest::Error> {
        let request = builder.build()?;
        debug!(method = %request.method(), url = %request.url(), "sending HTTP request");
        self.client.execute(request).await
    }

    async fn sleep_before_retry(&self) {
        if !self.policy.delay.is_zero() {
            tokio::time::sleep(self.policy.delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    policy: RetryPolicy,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            policy: RetryPolicy::default(),
            user_agent: Some(concat!("scanbridge/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.policy.max_attempts = attempts.max(1);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.policy.delay = delay;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, TransportError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| TransportError::InvalidRequest(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpClient {
            client,
            policy: RetryPolicy { max_attempts: self.policy.max_attempts.max(1), ..self.policy },
        })
    }
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_request() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    false
}
