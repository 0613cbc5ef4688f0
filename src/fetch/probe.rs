//! Burst probe for discovering an endpoint's rate limit
//!
//! Hammers a URL with spaced concurrent requests until the server answers
//! with something other than a success, then reports how many requests got
//! through and how fast. Run [`preflight`] first to confirm the endpoint
//! answers at all before committing to a burst.

use crate::fetch::fetcher::{validate_url, Fetcher, RequestOptions};
use crate::project::Stopwatch;
use crate::FetchError;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;

/// Options for a rate-limit burst probe
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Upper bound on requests to send
    pub max_requests: usize,

    /// Maximum number of requests in flight at once
    pub concurrency: usize,

    /// Pause between launching requests
    pub spacing: Duration,

    /// Request to repeat; defaults to a plain GET
    pub request: RequestOptions,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            max_requests: 1000,
            concurrency: 100,
            spacing: Duration::from_millis(50),
            request: RequestOptions::get(),
        }
    }
}

/// What a burst probe observed
#[derive(Debug, Clone)]
pub struct BurstReport {
    /// Total requests launched
    pub total_sent: u64,

    /// Successful requests before the first non-success response; `None`
    /// when the limit was never hit
    pub requests_before_limit: Option<u64>,

    /// Time from the first request to the first non-success response
    pub time_to_limit: Option<Duration>,

    /// Total probe duration
    pub elapsed: Duration,
}

impl BurstReport {
    /// Observed request rate per second up to the limit
    pub fn per_second(&self) -> Option<f64> {
        match (self.requests_before_limit, self.time_to_limit) {
            (Some(count), Some(elapsed)) if elapsed.as_secs_f64() > 0.0 => {
                Some(count as f64 / elapsed.as_secs_f64())
            }
            _ => None,
        }
    }

    /// Observed request rate per minute up to the limit
    pub fn per_minute(&self) -> Option<f64> {
        self.per_second().map(|rate| rate * 60.0)
    }
}

impl fmt::Display for BurstReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.requests_before_limit, self.time_to_limit) {
            (Some(count), Some(elapsed)) => {
                write!(
                    f,
                    "{} requests in {:.2}s before hitting the rate limit",
                    count,
                    elapsed.as_secs_f64()
                )?;
                if let (Some(per_sec), Some(per_min)) = (self.per_second(), self.per_minute()) {
                    write!(f, " ({:.0}/s, {:.0}/min)", per_sec, per_min)?;
                }
                Ok(())
            }
            _ => write!(
                f,
                "Never hit the rate limit after {} burst requests",
                self.total_sent
            ),
        }
    }
}

/// First non-success observation during a burst
#[derive(Debug)]
struct LimitHit {
    successes: u64,
    elapsed: Duration,
}

#[derive(Debug, Default)]
struct ProbeState {
    successes: AtomicU64,
    hit: Mutex<Option<LimitHit>>,
}

impl ProbeState {
    fn limit_hit(&self) -> bool {
        self.hit.lock().map(|hit| hit.is_some()).unwrap_or(true)
    }

    fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn record_hit(&self, elapsed: Duration) {
        if let Ok(mut hit) = self.hit.lock() {
            if hit.is_none() {
                *hit = Some(LimitHit {
                    successes: self.successes.load(Ordering::SeqCst),
                    elapsed,
                });
            }
        }
    }
}

/// Sends a single request and returns its status code
///
/// The check-before-burst step: confirm the endpoint answers (and with
/// what) before launching a full probe.
pub async fn preflight(
    fetcher: &Fetcher,
    url: &str,
    request: &RequestOptions,
) -> Result<u16, FetchError> {
    fetcher.fetch(url, request).await.map(|r| r.status_code)
}

/// Bursts `url` until the rate limit is observed or `max_requests` is reached
///
/// Transport errors during the burst are ignored; only a received
/// non-success response counts as hitting the limit. The report carries the
/// success count and timing up to that first non-success response.
pub async fn probe_rate_limit(
    fetcher: &Fetcher,
    url: &str,
    options: &ProbeOptions,
) -> Result<BurstReport, FetchError> {
    validate_url(url)?;

    let state = Arc::new(ProbeState::default());
    let watch = Stopwatch::start();
    let mut tasks: JoinSet<()> = JoinSet::new();
    let mut sent: u64 = 0;

    tracing::info!(url, max = options.max_requests, "Bursting endpoint");

    while (sent as usize) < options.max_requests {
        // Keep the in-flight window bounded
        while tasks.len() >= options.concurrency {
            tasks.join_next().await;
        }

        // Check only after draining a slot, so a just-finished request's
        // verdict is visible before the next one launches
        if state.limit_hit() {
            break;
        }

        let fetcher = fetcher.clone();
        let url = url.to_string();
        let request = options.request.clone();
        let state = Arc::clone(&state);
        tasks.spawn(async move {
            match fetcher.fetch(&url, &request).await {
                Ok(result) if result.is_success() => state.record_success(),
                Ok(_) => state.record_hit(watch.lap()),
                Err(_) => {}
            }
        });
        sent += 1;

        if !options.spacing.is_zero() {
            tokio::time::sleep(options.spacing).await;
        }
    }

    while tasks.join_next().await.is_some() {}

    let elapsed = watch.lap();
    let (requests_before_limit, time_to_limit) = match state.hit.lock() {
        Ok(guard) => match guard.as_ref() {
            Some(hit) => (Some(hit.successes), Some(hit.elapsed)),
            None => (None, None),
        },
        Err(_) => (None, None),
    };

    let report = BurstReport {
        total_sent: sent,
        requests_before_limit,
        time_to_limit,
        elapsed,
    };
    tracing::info!(%report, "Burst probe finished");

    Ok(report)
}
