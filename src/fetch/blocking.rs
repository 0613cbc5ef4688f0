//! Synchronous variant of the fetcher
//!
//! Identical semantics to [`Fetcher`]: same URL validation, same transport
//! classification, same opportunistic rate-limit header parsing. It differs
//! only in how the caller awaits completion. Must not be used from inside a
//! tokio runtime; reqwest's blocking client refuses to run there.
//!
//! [`Fetcher`]: crate::fetch::Fetcher

use crate::config::FetchConfig;
use crate::fetch::client::build_blocking_client;
use crate::fetch::fetcher::{
    classify_transport, remaining_quota, retry_after_seconds, validate_url, FetchResult, Method,
    RequestOptions,
};
use crate::fetch::retry::RetryPolicy;
use crate::FetchError;

/// Blocking counterpart of [`Fetcher`](crate::fetch::Fetcher)
#[derive(Debug, Clone)]
pub struct BlockingFetcher {
    client: reqwest::blocking::Client,
}

impl BlockingFetcher {
    /// Creates a blocking fetcher with default configuration
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::from_config(&FetchConfig::default())
    }

    /// Creates a blocking fetcher from a [`FetchConfig`]
    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_blocking_client(config)?,
        })
    }

    /// Fetches `url`, blocking the current thread
    pub fn fetch(&self, url: &str, options: &RequestOptions) -> Result<FetchResult, FetchError> {
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

        let response = request.send().map_err(|e| classify_transport(url, &e))?;

        let status_code = response.status().as_u16();
        let remaining = remaining_quota(response.headers());
        let retry_after = retry_after_seconds(response.headers());

        tracing::debug!(status = status_code, url, "Response received");

        let body = response.text().map_err(|e| classify_transport(url, &e))?;

        Ok(FetchResult {
            status_code,
            body,
            remaining_quota: remaining,
            retry_after_seconds: retry_after,
        })
    }

    /// Fetches with retry, blocking between attempts
    ///
    /// Same policy semantics as
    /// [`Fetcher::fetch_with_retry`](crate::fetch::Fetcher::fetch_with_retry).
    pub fn fetch_with_retry(
        &self,
        url: &str,
        options: &RequestOptions,
        policy: &RetryPolicy,
    ) -> Result<FetchResult, FetchError> {
        let mut attempt = 1;
        loop {
            match self.fetch(url, options) {
                Ok(result) => {
                    if !RetryPolicy::retryable_status(result.status_code)
                        || attempt >= policy.max_attempts
                    {
                        return Ok(result);
                    }
                    let delay = policy.backoff_delay(attempt, result.retry_after_seconds);
                    tracing::warn!(
                        status = result.status_code,
                        attempt,
                        delay_secs = delay.as_secs(),
                        url,
                        "Retryable status; backing off"
                    );
                    std::thread::sleep(delay);
                }
                Err(error @ FetchError::InvalidUrl(_)) => return Err(error),
                Err(error) => {
                    if attempt >= policy.max_attempts {
                        return Err(error);
                    }
                    tracing::warn!(
                        error = %crate::format_error(&error),
                        attempt,
                        url,
                        "Transport failure; retrying"
                    );
                    std::thread::sleep(policy.delay_for_attempt(attempt));
                }
            }
            attempt += 1;
        }
    }
}
