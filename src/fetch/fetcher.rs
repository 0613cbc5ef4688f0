//! The rate-limit-aware HTTP fetcher
//!
//! One call, one outcome: a [`FetchResult`] for any received HTTP response
//! (4xx/5xx included — those are information for the caller, not failures),
//! or a [`FetchError`] when no response could be obtained at all. Rate-limit
//! response headers are parsed opportunistically into the result; their
//! absence is not an error.

use crate::config::FetchConfig;
use crate::fetch::client::build_http_client;
use crate::{FetchError, TransportCause};
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Response headers that communicate remaining request quota
const REMAINING_QUOTA_HEADERS: &[&str] = &["x-ratelimit-remaining", "ratelimit-remaining"];

/// HTTP methods supported by the fetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Explicit per-request options
///
/// Enumerates everything a request can vary: method, timeout, extra headers,
/// and an optional body for POST.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Request method
    pub method: Method,

    /// Per-request timeout; overrides the client default
    pub timeout: Duration,

    /// Additional headers sent with the request
    pub headers: Vec<(String, String)>,

    /// Request body; only meaningful for POST
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            timeout: Duration::from_secs(45),
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    /// Options for a plain GET request
    pub fn get() -> Self {
        Self::default()
    }

    /// Options for a POST request with the given body
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            body: Some(body.into()),
            ..Self::default()
        }
    }

    /// Options for a POST request with a JSON-serialized body
    ///
    /// Sets the `content-type: application/json` header.
    pub fn post_json<T: serde::Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::post(serde_json::to_string(value)?)
            .with_header("content-type", "application/json"))
    }

    /// Sets the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Normalized outcome of a fetch
///
/// Produced for every received HTTP response, whatever its status code.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// HTTP status code
    pub status_code: u16,

    /// Raw response body; empty when the server sent none
    pub body: String,

    /// Remaining request quota, when the server advertised one
    pub remaining_quota: Option<u64>,

    /// Requested backoff in seconds, when the server advertised one
    pub retry_after_seconds: Option<u64>,
}

impl FetchResult {
    /// True for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// True for HTTP 429
    pub fn is_rate_limited(&self) -> bool {
        self.status_code == 429
    }
}

/// Issues HTTP requests and normalizes the outcome
///
/// Holds only the shared connection pool; no per-request state survives a
/// call, so a `Fetcher` can be cloned freely and shared across tasks.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with default configuration
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::from_config(&FetchConfig::default())
    }

    /// Creates a fetcher from a [`FetchConfig`]
    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` with the given options
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResult)` - An HTTP response was received, any status code
    /// * `Err(FetchError::InvalidUrl)` - Malformed URL; no network call made
    /// * `Err(FetchError::Transport)` - DNS/connect/timeout failure; a
    ///   timeout cancels the in-flight request and no partial body escapes
    pub async fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<FetchResult, FetchError> {
        let parsed = validate_url(url)?;

        let mut request = match options.method {
            Method::Get => self.client.get(parsed),
            Method::Post => self.client.post(parsed),
        };
        request = request.timeout(options.timeout);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_transport(url, &e))?;

        let status_code = response.status().as_u16();
        let remaining_quota = remaining_quota(response.headers());
        let retry_after_seconds = retry_after_seconds(response.headers());

        tracing::debug!(status = status_code, url, "Response received");

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport(url, &e))?;

        Ok(FetchResult {
            status_code,
            body,
            remaining_quota,
            retry_after_seconds,
        })
    }
}

/// Validates that a URL is well-formed http(s) before any network call
pub(crate) fn validate_url(url: &str) -> Result<Url, FetchError> {
    let parsed =
        Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{} ({})", url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(FetchError::InvalidUrl(format!(
            "{} (unsupported scheme '{}')",
            url,
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none() {
        return Err(FetchError::InvalidUrl(format!("{} (missing host)", url)));
    }

    Ok(parsed)
}

/// Classifies a reqwest error into a [`FetchError::Transport`]
pub(crate) fn classify_transport(url: &str, error: &reqwest::Error) -> FetchError {
    let cause = if error.is_timeout() {
        TransportCause::Timeout
    } else if error.is_connect() {
        TransportCause::Connect(crate::format_error(error))
    } else {
        TransportCause::Other(crate::format_error(error))
    };

    FetchError::Transport {
        url: url.to_string(),
        cause,
    }
}

/// Reads the remaining-quota rate-limit header, if any
pub(crate) fn remaining_quota(headers: &HeaderMap) -> Option<u64> {
    REMAINING_QUOTA_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}

/// Reads the Retry-After header in its delta-seconds form, if any
///
/// The HTTP-date form is not parsed; an unparseable value is treated the
/// same as an absent header.
pub(crate) fn retry_after_seconds(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
