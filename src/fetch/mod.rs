//! HTTP fetching for scrapers
//!
//! This module handles:
//! - Building configured HTTP clients (async and blocking)
//! - Issuing GET/POST requests with explicit per-request options
//! - Normalizing any received response into a [`FetchResult`]
//! - Classifying transport failures (DNS, connect, timeout)
//! - Caller-side retry with `Retry-After` awareness
//! - Burst-probing an endpoint to discover its rate limit

mod blocking;
mod client;
mod fetcher;
mod probe;
mod retry;

pub use blocking::BlockingFetcher;
pub use client::{build_blocking_client, build_http_client};
pub use fetcher::{FetchResult, Fetcher, Method, RequestOptions};
pub use probe::{preflight, probe_rate_limit, BurstReport, ProbeOptions};
pub use retry::RetryPolicy;
