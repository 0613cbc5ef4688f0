//! Integration tests for the fetcher
//!
//! These tests use wiremock to stand up real HTTP servers and exercise the
//! fetch, retry, and probe paths end-to-end.

use scrapkit::fetch::{
    preflight, probe_rate_limit, BlockingFetcher, Fetcher, ProbeOptions, RequestOptions,
    RetryPolicy,
};
use scrapkit::{FetchError, TransportCause};
use std::time::{Duration, Instant};
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_success_with_rate_limit_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("payload")
                .insert_header("X-RateLimit-Remaining", "42"),
        )
        .mount(&server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let result = fetcher
        .fetch(&format!("{}/api", server.uri()), &RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(result.status_code, 200);
    assert_eq!(result.body, "payload");
    assert_eq!(result.remaining_quota, Some(42));
    assert_eq!(result.retry_after_seconds, None);
}

#[tokio::test]
async fn test_429_with_empty_body_is_a_result_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let result = fetcher
        .fetch(&format!("{}/limited", server.uri()), &RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(result.status_code, 429);
    assert_eq!(result.body, "");
    assert_eq!(result.retry_after_seconds, Some(7));
    assert!(result.is_rate_limited());
}

#[tokio::test]
async fn test_404_is_inspectable_information() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let result = fetcher
        .fetch(&format!("{}/missing", server.uri()), &RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(result.status_code, 404);
    assert_eq!(result.body, "gone");
    assert!(!result.is_success());
}

#[tokio::test]
async fn test_post_sends_body_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(body_string("name=x"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let options = RequestOptions::post("name=x")
        .with_header("content-type", "application/x-www-form-urlencoded");
    let result = fetcher
        .fetch(&format!("{}/submit", server.uri()), &options)
        .await
        .unwrap();

    assert_eq!(result.status_code, 201);
    assert_eq!(result.body, "created");
}

#[tokio::test]
async fn test_invalid_url_fails_without_network_call() {
    let fetcher = Fetcher::new().unwrap();
    let result = fetcher.fetch("not a url", &RequestOptions::get()).await;

    assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_within_timeout() {
    let fetcher = Fetcher::new().unwrap();
    let options = RequestOptions::get().with_timeout(Duration::from_secs(5));

    let started = Instant::now();
    // Port 1 on loopback: nothing listens there
    let result = fetcher.fetch("http://127.0.0.1:1/", &options).await;
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(FetchError::Transport { .. })));
    assert!(
        elapsed < Duration::from_secs(10),
        "transport failure took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_timeout_surfaces_as_transport_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let options = RequestOptions::get().with_timeout(Duration::from_millis(300));
    let result = fetcher
        .fetch(&format!("{}/slow", server.uri()), &options)
        .await;

    match result {
        Err(FetchError::Transport { cause, .. }) => {
            assert!(matches!(cause, TransportCause::Timeout))
        }
        other => panic!("expected transport timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_retry_recovers_after_server_errors() {
    let server = MockServer::start().await;
    // Two 500s, then healthy
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let policy = RetryPolicy::new(5).with_base_delay(Duration::from_millis(10));
    let result = fetcher
        .fetch_with_retry(
            &format!("{}/flaky", server.uri()),
            &RequestOptions::get(),
            &policy,
        )
        .await
        .unwrap();

    assert_eq!(result.status_code, 200);
    assert_eq!(result.body, "recovered");
}

#[tokio::test]
async fn test_retry_gives_up_and_returns_last_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/always-limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let policy = RetryPolicy::new(2).with_base_delay(Duration::from_millis(10));
    let result = fetcher
        .fetch_with_retry(
            &format!("{}/always-limited", server.uri()),
            &RequestOptions::get(),
            &policy,
        )
        .await
        .unwrap();

    // Still a result the caller can inspect, not an error
    assert_eq!(result.status_code, 429);
}

#[tokio::test]
async fn test_invalid_url_is_not_retried() {
    let fetcher = Fetcher::new().unwrap();
    let policy = RetryPolicy::new(5).with_base_delay(Duration::from_secs(30));

    let started = Instant::now();
    let result = fetcher
        .fetch_with_retry("not a url", &RequestOptions::get(), &policy)
        .await;

    assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    // Returned immediately; no backoff sleeps happened
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_blocking_fetcher_matches_async_semantics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sync"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("sync body")
                .insert_header("X-RateLimit-Remaining", "5"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/sync", server.uri());
    // The blocking client refuses to run on an async worker thread
    let result = tokio::task::spawn_blocking(move || {
        let fetcher = BlockingFetcher::new().unwrap();
        fetcher.fetch(&url, &RequestOptions::get())
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(result.status_code, 200);
    assert_eq!(result.body, "sync body");
    assert_eq!(result.remaining_quota, Some(5));
}

#[tokio::test]
async fn test_preflight_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let status = preflight(
        &fetcher,
        &format!("{}/check", server.uri()),
        &RequestOptions::get(),
    )
    .await
    .unwrap();

    assert_eq!(status, 403);
}

#[tokio::test]
async fn test_probe_detects_rate_limit() {
    let server = MockServer::start().await;
    // Four successes, then the endpoint rate-limits
    Mock::given(method("GET"))
        .and(path("/burst"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/burst"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let options = ProbeOptions {
        max_requests: 50,
        concurrency: 1, // sequential so the count is deterministic
        spacing: Duration::ZERO,
        request: RequestOptions::get(),
    };
    let report = probe_rate_limit(&fetcher, &format!("{}/burst", server.uri()), &options)
        .await
        .unwrap();

    assert_eq!(report.requests_before_limit, Some(4));
    assert_eq!(report.total_sent, 5);
    assert!(report.to_string().contains("4 requests"));
}

#[tokio::test]
async fn test_probe_without_limit_reports_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/open"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new().unwrap();
    let options = ProbeOptions {
        max_requests: 10,
        concurrency: 2,
        spacing: Duration::ZERO,
        request: RequestOptions::get(),
    };
    let report = probe_rate_limit(&fetcher, &format!("{}/open", server.uri()), &options)
        .await
        .unwrap();

    assert_eq!(report.requests_before_limit, None);
    assert_eq!(report.total_sent, 10);
}

#[tokio::test]
async fn test_probe_rejects_invalid_url() {
    let fetcher = Fetcher::new().unwrap();
    let result = probe_rate_limit(&fetcher, "not a url", &ProbeOptions::default()).await;
    assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
}
