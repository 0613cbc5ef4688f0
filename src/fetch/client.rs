use crate::config::FetchConfig;
use reqwest::Client;

/// Builds the async HTTP client used by [`Fetcher`]
///
/// The client carries the configured user agent, timeouts, and transparent
/// gzip/brotli decompression. It holds the connection pool, so build it once
/// and clone the fetcher rather than rebuilding per request.
///
/// [`Fetcher`]: crate::fetch::Fetcher
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the blocking HTTP client used by [`BlockingFetcher`]
///
/// Must not be called from inside an async runtime; use [`Fetcher`] there.
///
/// [`BlockingFetcher`]: crate::fetch::BlockingFetcher
/// [`Fetcher`]: crate::fetch::Fetcher
pub fn build_blocking_client(
    config: &FetchConfig,
) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}
