//! API client integration tests against a mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lifedash_core::{
    ApiClient, ApiError, PomodoroSessionRecord, ResponseCache, SessionStatus,
};
use mockito::Matcher;
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    ApiClient::with_cache(
        &server.url(),
        "test-token",
        Arc::new(ResponseCache::new()),
        Duration::from_secs(5),
        Duration::from_secs(30),
    )
    .expect("client construction")
}

fn sample_record() -> PomodoroSessionRecord {
    PomodoroSessionRecord {
        task_name: "write tests".into(),
        start_time: Utc::now(),
        end_time: Utc::now(),
        duration_minutes: 25,
        status: SessionStatus::Completed,
        note: None,
    }
}

#[tokio::test]
async fn counts_cached_until_submission_invalidates() {
    let mut server = mockito::Server::new_async().await;

    let counts_before = server
        .mock("GET", "/pomodoro-counts")
        .match_header("authorization", "Bearer test-token")
        .with_header("content-type", "application/json")
        .with_body(json!({"today": 2, "week": 5, "total": 40}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);

    let first = client.session_counts().await.unwrap();
    let second = client.session_counts().await.unwrap();
    assert_eq!(first.today, 2);
    assert_eq!(second.today, 2);
    // Only one request reached the server.
    counts_before.assert_async().await;

    let post = server
        .mock("POST", "/pomodoro-sessions")
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "taskName": "write tests",
                "startTime": "2026-01-05T09:00:00Z",
                "endTime": "2026-01-05T09:25:00Z",
                "durationMinutes": 25,
                "status": "COMPLETED"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    // Later-registered mock takes priority for the same route.
    let counts_after = server
        .mock("GET", "/pomodoro-counts")
        .with_header("content-type", "application/json")
        .with_body(json!({"today": 3, "week": 6, "total": 41}).to_string())
        .expect(1)
        .create_async()
        .await;

    client.submit_session(&sample_record()).await.unwrap();
    post.assert_async().await;

    // Read-your-writes: the submission invalidated the cached counts.
    let refreshed = client.session_counts().await.unwrap();
    assert_eq!(refreshed.today, 3);
    counts_after.assert_async().await;
}

#[tokio::test]
async fn history_sends_pagination_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pomodoro-sessions")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("size".into(), "20".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "items": [],
                "total": 0,
                "hasMore": false,
                "streakCount": 3
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let page = client.session_history(1, 20).await.unwrap();
    assert!(!page.has_more);
    assert_eq!(page.streak_count, 3);
    mock.assert_async().await;
}

#[tokio::test]
async fn different_pages_are_cached_independently() {
    let mut server = mockito::Server::new_async().await;
    let empty_page = json!({"items": [], "total": 0, "hasMore": false}).to_string();
    let mock = server
        .mock("GET", "/pomodoro-sessions")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(empty_page)
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    client.session_history(0, 20).await.unwrap();
    client.session_history(1, 20).await.unwrap();
    // Distinct keys, so page 1 could not be served from page 0's entry.
    mock.assert_async().await;
}

#[tokio::test]
async fn concurrent_identical_reads_are_deduplicated() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pomodoro-streak")
        .with_header("content-type", "application/json")
        .with_body(json!({"streakCount": 4, "hasCompletedToday": true}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let (a, b) = tokio::join!(client.streak_summary(), client.streak_summary());
    assert_eq!(a.unwrap().streak_count, 4);
    assert_eq!(b.unwrap().streak_count, 4);
    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_maps_to_credential_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/pomodoro-streak")
        .with_status(401)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.streak_summary().await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
}

#[tokio::test]
async fn server_errors_are_not_cached() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/pomodoro-counts")
        .with_status(500)
        .with_body("boom")
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    for _ in 0..2 {
        match client.session_counts().await {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
    // Both calls reached the server: the failure neither populated the
    // cache nor left a stale in-flight marker.
    mock.assert_async().await;
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn failed_submission_leaves_cache_untouched() {
    let mut server = mockito::Server::new_async().await;
    let _counts = server
        .mock("GET", "/pomodoro-counts")
        .with_header("content-type", "application/json")
        .with_body(json!({"today": 1, "week": 1, "total": 1}).to_string())
        .expect(1)
        .create_async()
        .await;
    let _post = server
        .mock("POST", "/pomodoro-sessions")
        .with_status(503)
        .create_async()
        .await;

    let client = client_for(&server);
    client.session_counts().await.unwrap();

    let err = client.submit_session(&sample_record()).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));

    // Failed mutation must not have invalidated the cached read.
    let counts = client.session_counts().await.unwrap();
    assert_eq!(counts.today, 1);
}

#[tokio::test]
async fn analysis_consumes_and_invalidates_remaining_uses() {
    let mut server = mockito::Server::new_async().await;
    let remaining_before = server
        .mock("GET", "/pomodoro-ai-remaining")
        .with_header("content-type", "application/json")
        .with_body(json!({"remainingUses": 3, "totalAllowed": 5}).to_string())
        .expect(1)
        .create_async()
        .await;
    let analysis = server
        .mock("POST", "/pomodoro-analysis")
        .with_header("content-type", "application/json")
        .with_body(json!({"insight": "Focus peaks mid-morning.", "remainingUses": 2}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let usage = client.ai_remaining().await.unwrap();
    assert_eq!(usage.remaining_uses, 3);
    remaining_before.assert_async().await;

    let remaining_after = server
        .mock("GET", "/pomodoro-ai-remaining")
        .with_header("content-type", "application/json")
        .with_body(json!({"remainingUses": 2, "totalAllowed": 5}).to_string())
        .expect(1)
        .create_async()
        .await;

    let insight = client.request_analysis().await.unwrap();
    assert_eq!(insight.remaining_uses, Some(2));
    analysis.assert_async().await;

    let usage = client.ai_remaining().await.unwrap();
    assert_eq!(usage.remaining_uses, 2);
    remaining_after.assert_async().await;
}
