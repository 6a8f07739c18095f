//! Shared HTTP client used by every provider adapter.

use crate::config::ClientConfig;
use governor::{Quota, RateLimiter};
use ip2whois_core::{AdapterFailure, LookupError};
use reqwest::header::ACCEPT;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Outbound client shared across adapters and across requests.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone)]
pub struct LookupClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    config: ClientConfig,
    rate_limiter: Option<DirectRateLimiter>,
}

impl std::fmt::Debug for LookupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl LookupClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self, LookupError> {
        LookupClientBuilder::new().build()
    }

    /// Create a client from a full configuration
    pub fn from_config(config: ClientConfig) -> Result<Self, LookupError> {
        LookupClientBuilder::from_config(config).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> LookupClientBuilder {
        LookupClientBuilder::new()
    }

    /// The configuration the client was built with
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Default per-provider timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.inner.config.timeout()
    }

    /// Build a provider URL from a base, path segments and query parameters.
    ///
    /// Segments are percent-encoded individually, so a query string can never
    /// escape its path position.
    pub(crate) fn endpoint(
        base: &str,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Url, AdapterFailure> {
        let mut url = Url::parse(base)
            .map_err(|e| AdapterFailure::Network(format!("invalid endpoint {base}: {e}")))?;

        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| AdapterFailure::Network(format!("invalid endpoint {base}")))?;
            path.pop_if_empty().extend(segments);
        }

        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Wait for an outbound request slot.
    ///
    /// Returns immediately when no rate limit is configured. The wait is not
    /// part of any request timeout.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.inner.rate_limiter {
            limiter.until_ready().await;
        }
    }

    /// Perform a GET request and decode the JSON body.
    ///
    /// Sending and reading the body are bounded by `timeout`. When it elapses
    /// the request future is dropped, which aborts the connection. The caller
    /// is expected to have taken a slot with [`acquire`](Self::acquire).
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        accept: Option<&str>,
        timeout: Duration,
    ) -> Result<T, AdapterFailure> {
        debug!(url = %url, ?timeout, "GET request");

        let mut request = self.inner.http.get(url).timeout(timeout);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| transport_failure(&e, timeout))?;

            let status = response.status();
            if !status.is_success() {
                debug!(status = status.as_u16(), "non-success response");
                return Err(AdapterFailure::UpstreamError {
                    status: status.as_u16(),
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| transport_failure(&e, timeout))?;

            serde_json::from_slice(&body).map_err(AdapterFailure::from)
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(AdapterFailure::Timeout { after: timeout }),
        }
    }
}

/// Map a reqwest error onto the adapter failure taxonomy
fn transport_failure(err: &reqwest::Error, timeout: Duration) -> AdapterFailure {
    if err.is_timeout() {
        AdapterFailure::Timeout { after: timeout }
    } else if err.is_decode() {
        AdapterFailure::MalformedResponse(err.to_string())
    } else {
        AdapterFailure::Network(err.to_string())
    }
}

/// Builder for configuring a [`LookupClient`]
#[derive(Debug, Clone, Default)]
pub struct LookupClientBuilder {
    config: ClientConfig,
}

impl LookupClientBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    #[must_use]
    pub const fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Set the per-provider timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the WhoisXML API key
    #[must_use]
    pub fn whoisxml_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.whoisxml_api_key = key.into();
        self
    }

    /// Limit outbound requests per second
    #[must_use]
    pub const fn requests_per_second(mut self, rps: u32) -> Self {
        self.config.requests_per_second = Some(rps);
        self
    }

    /// Set the RDAP bootstrap base URL
    #[must_use]
    pub fn rdap_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoints.rdap = url.into();
        self
    }

    /// Set the WhoisXML API base URL
    #[must_use]
    pub fn whoisxml_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoints.whoisxml = url.into();
        self
    }

    /// Set the ipwhois.io base URL
    #[must_use]
    pub fn ipwhois_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoints.ipwhois = url.into();
        self
    }

    /// Set the ipapi.co base URL
    #[must_use]
    pub fn ipapi_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoints.ipapi = url.into();
        self
    }

    /// Point every provider at one base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoints = crate::config::Endpoints::all(url);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<LookupClient, LookupError> {
        self.config.validate()?;

        let http = HttpClient::builder()
            .timeout(self.config.timeout())
            .user_agent(&self.config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| LookupError::Config(format!("failed to build HTTP client: {e}")))?;

        let rate_limiter = self
            .config
            .requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Ok(LookupClient {
            inner: Arc::new(ClientInner {
                http,
                config: self.config,
                rate_limiter,
            }),
        })
    }
}
