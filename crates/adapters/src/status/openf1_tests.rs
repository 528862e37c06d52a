// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mockito::Matcher;
use racelight_core::{Flag, StatusCode};

fn adapter_for(server: &mockito::ServerGuard) -> OpenF1Adapter {
    OpenF1Adapter::new(format!("{}/", server.url()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn track_status_decodes_string_codes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/track_status")
        .match_header("accept", "application/json")
        .match_header("user-agent", Matcher::Regex("^racelight/".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"status": "4", "message": "SCDeployed", "date": "2024-05-26T13:40:00Z"}, {"status": "1"}]"#)
        .create_async()
        .await;

    let records = adapter_for(&server).track_status().await.unwrap();

    mock.assert_async().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].status, StatusCode(4));
    assert_eq!(records[0].status.flag(), Flag::Safety);
    assert_eq!(records[0].message.as_deref(), Some("SCDeployed"));
    assert_eq!(records[1].status.flag(), Flag::Green);
}

#[tokio::test]
async fn track_status_empty_array_is_ok() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/track_status")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let records = adapter_for(&server).track_status().await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn rate_limit_is_reported_distinctly() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/track_status")
        .with_status(429)
        .create_async()
        .await;

    let err = adapter_for(&server).track_status().await.unwrap_err();
    assert!(matches!(err, StatusError::RateLimited));
    assert!(err.to_string().contains("Rate limit exceeded"));
}

#[tokio::test]
async fn server_error_reports_http_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/session")
        .with_status(503)
        .create_async()
        .await;

    let err = adapter_for(&server).sessions().await.unwrap_err();
    assert!(matches!(err, StatusError::Http { status: 503 }));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/track_status")
        .with_status(200)
        .with_body(r#"{"detail": "nope"}"#)
        .create_async()
        .await;

    let err = adapter_for(&server).track_status().await.unwrap_err();
    assert!(matches!(err, StatusError::Decode(_)));
}

#[tokio::test]
async fn sessions_decode_with_missing_fields() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/session")
        .with_status(200)
        .with_body(r#"[{"session_key": 9523, "session_name": "Race", "circuit_short_name": "Monaco"}, {}]"#)
        .create_async()
        .await;

    let sessions = adapter_for(&server).sessions().await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].session_key, Some(9523));
    assert_eq!(sessions[1], SessionInfo::default());
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let adapter = OpenF1Adapter::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let err = adapter.track_status().await.unwrap_err();
    assert!(matches!(err, StatusError::Network(_) | StatusError::Timeout));
}
