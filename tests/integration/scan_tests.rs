//! Integration tests for the streaming username-scan API.
//!
//! Tests verify:
//! - NDJSON event shapes and ordering
//! - Validation (no process spawned for rejected usernames)
//! - Scanner cleanup when the client disconnects mid-stream
//! - Error envelopes for spawn failures

use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use web_toolbox::server::{create_router, RouterConfig};

use super::test_utils::{
    collect_ndjson, collect_text, BrokenScanner, FakeScanner, PendingScanner,
};

fn test_router_config() -> RouterConfig {
    RouterConfig::new().with_tracing(false)
}

// =============================================================================
// Streaming
// =============================================================================

#[tokio::test]
async fn test_scan_streams_ndjson_events() {
    let scanner = FakeScanner::new(
        b"[+] GitHub: https://github.com/alice\n[-] Twitter: Not Found\n",
        b"",
    );
    let router = create_router(scanner, test_router_config());

    let request = Request::builder()
        .uri("/api/v1/usernames/alice")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/x-ndjson"
    );
    assert!(response.headers().get("content-length").is_none());

    let events = collect_ndjson(response).await;
    assert_eq!(events.len(), 2);

    assert_eq!(events[0]["id"], "GitHub");
    assert_eq!(events[0]["available"], false);
    assert_eq!(events[0]["message"], "Found!");
    assert_eq!(events[0]["url"], "https://github.com/alice");

    assert_eq!(events[1]["id"], "Twitter");
    assert_eq!(events[1]["available"], true);
    assert_eq!(events[1]["message"], "Not Found");
    assert!(events[1].get("url").is_none());
}

#[tokio::test]
async fn test_scan_binds_username_to_spawned_process() {
    let scanner = FakeScanner::new(b"", b"");
    let last_username = scanner.last_username();
    let router = create_router(scanner, test_router_config());

    let request = Request::builder()
        .uri("/api/v1/usernames/charlie")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let _ = collect_ndjson(response).await;

    assert_eq!(last_username.lock().unwrap().as_deref(), Some("charlie"));
}

#[tokio::test]
async fn test_scan_forwards_stderr_summary() {
    let scanner = FakeScanner::new(
        b"[+] GitHub: https://github.com/alice\n",
        b"sherlock: error: connection refused\nprogress noise\n",
    );
    let router = create_router(scanner, test_router_config());

    let request = Request::builder()
        .uri("/api/v1/usernames/alice")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let events = collect_ndjson(response).await;

    let errors: Vec<_> = events.iter().filter(|e| e.get("error").is_some()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["error"], "connection refused");
}

#[tokio::test]
async fn test_scan_every_line_matches_a_documented_shape() {
    let scanner = FakeScanner::new(
        b"noise line\n[+] GitHub: https://x\n[-] Dev: Claimed elsewhere\n",
        b"sherlock: error: flaky\n",
    );
    let router = create_router(scanner, test_router_config());

    let request = Request::builder()
        .uri("/api/v1/usernames/alice")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    for event in collect_ndjson(response).await {
        let is_result = event.get("id").is_some()
            && event.get("available").is_some()
            && event.get("message").is_some();
        let is_error = event.get("error").is_some();
        assert!(is_result ^ is_error, "unexpected event shape: {event}");
    }
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_scan_rejects_oversized_username_before_spawn() {
    let scanner = FakeScanner::new(b"[+] GitHub: https://x\n", b"");
    let spawn_count = scanner.spawn_count();
    let router = create_router(scanner, test_router_config());

    let long_username = "x".repeat(65);
    let request = Request::builder()
        .uri(format!("/api/v1/usernames/{long_username}"))
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value =
        serde_json::from_str(&collect_text(response).await).unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["status"], 400);

    // No process side effect on rejection
    assert_eq!(spawn_count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scan_accepts_maximum_length_username() {
    let scanner = FakeScanner::new(b"", b"");
    let router = create_router(scanner, test_router_config());

    let username = "x".repeat(64);
    let request = Request::builder()
        .uri(format!("/api/v1/usernames/{username}"))
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Failure Handling
// =============================================================================

#[tokio::test]
async fn test_scan_spawn_failure_returns_500_envelope() {
    let router = create_router(BrokenScanner, test_router_config());

    let request = Request::builder()
        .uri("/api/v1/usernames/alice")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value =
        serde_json::from_str(&collect_text(response).await).unwrap();
    assert_eq!(body["error"], "scanner_error");
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_scan_client_disconnect_kills_process() {
    let scanner = PendingScanner::new();
    let killed = scanner.killed();
    let router = create_router(scanner, test_router_config());

    let request = Request::builder()
        .uri("/api/v1/usernames/alice")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Dropping the streaming body simulates the client going away
    drop(response);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !killed.load(Ordering::SeqCst) {
        assert!(
            tokio::time::Instant::now() < deadline,
            "scanner was not terminated after client disconnect"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
