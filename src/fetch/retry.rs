//! Caller-side retry for fetches
//!
//! [`Fetcher::fetch`] never retries on its own; this wrapper implements the
//! usual scraper loop: retry transport failures and 420/429/5xx statuses,
//! sleeping between attempts and honoring a server-provided `Retry-After`.

use crate::config::RetryConfig;
use crate::fetch::fetcher::{FetchResult, Fetcher, RequestOptions};
use crate::FetchError;
use std::time::Duration;

/// Policy for retrying failed or rate-limited fetches
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,

    /// Delay before the next attempt
    pub base_delay: Duration,

    /// Double the delay on each subsequent attempt
    pub exponential_backoff: bool,

    /// Upper bound on any delay, including server-requested backoff
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt count and defaults otherwise
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            exponential_backoff: false,
            max_delay: Duration::ZERO,
        }
    }

    /// Sets the base delay
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Enables or disables exponential backoff
    pub fn with_exponential_backoff(mut self, enabled: bool) -> Self {
        self.exponential_backoff = enabled;
        self
    }

    /// Delay before the attempt following attempt number `attempt` (1-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = if self.exponential_backoff {
            self.base_delay
                .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
        } else {
            self.base_delay
        };
        delay.min(self.max_delay)
    }

    /// Delay for a retryable status, honoring a parsed `Retry-After`
    ///
    /// The server's requested backoff wins when it is longer than ours, but
    /// is still capped at `max_delay`.
    pub fn backoff_delay(&self, attempt: u32, retry_after_seconds: Option<u64>) -> Duration {
        let mut delay = self.delay_for_attempt(attempt);
        if let Some(secs) = retry_after_seconds {
            delay = delay.max(Duration::from_secs(secs));
        }
        delay.min(self.max_delay)
    }

    /// Whether a status code warrants a retry (420, 429, or any 5xx)
    pub fn retryable_status(status: u16) -> bool {
        status == 420 || status == 429 || status >= 500
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_secs(config.base_delay_secs),
            exponential_backoff: config.exponential_backoff,
            max_delay: Duration::from_secs(config.max_delay_secs),
        }
    }
}

impl Fetcher {
    /// Fetches with retry according to `policy`
    ///
    /// Retries transport failures and retryable statuses; an invalid URL is
    /// returned immediately since no attempt can ever succeed. The final
    /// attempt's outcome — response or transport error — is returned as-is,
    /// so a still-429 result after the last attempt is an `Ok` the caller
    /// can inspect.
    pub async fn fetch_with_retry(
        &self,
        url: &str,
        options: &RequestOptions,
        policy: &RetryPolicy,
    ) -> Result<FetchResult, FetchError> {
        let mut attempt = 1;
        loop {
            match self.fetch(url, options).await {
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
                    tokio::time::sleep(delay).await;
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
                    tokio::time::sleep(policy.delay_for_attempt(attempt)).await;
                }
            }
            attempt += 1;
        }
    }
}
