//! Health, readiness and metrics endpoint integration tests.
//!
//! Tests the operational endpoints using the `TestTokenServer` harness.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::Value;
use std::sync::Arc;
use token_service::services::MockTokenSigner;
use token_test_utils::TestTokenServer;

/// Test that health endpoint returns 200 and "OK".
#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

/// Test that readiness succeeds when the signer works.
#[tokio::test]
async fn test_ready_endpoint_returns_ready() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::get(format!("{}/ready", server.url())).await?;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body["status"], "ready");

    Ok(())
}

/// Test that readiness fails when the signer cannot sign.
#[tokio::test]
async fn test_ready_endpoint_returns_503_when_signer_fails() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn_with_signer(Arc::new(MockTokenSigner::failing())).await?;

    let response = reqwest::get(format!("{}/ready", server.url())).await?;

    assert_eq!(response.status(), 503);
    let body: Value = response.json().await?;
    assert_eq!(body["status"], "not_ready");

    Ok(())
}

/// Find a rendered sample line for `name` carrying every `label="value"` pair.
fn find_sample<'a>(body: &'a str, name: &str, labels: &[&str]) -> Option<&'a str> {
    body.lines().find(|line| {
        line.starts_with(&format!("{}{{", name)) && labels.iter().all(|l| line.contains(l))
    })
}

/// Test that the metrics endpoint renders the series recorded by a
/// successful issuance.
#[tokio::test]
async fn test_metrics_endpoint_reports_issuance() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let client = reqwest::Client::new();

    let issued = client
        .post(format!("{}/api/v1/rtc/token", server.url()))
        .json(&serde_json::json!({"channelName": "room42", "uid": 7}))
        .send()
        .await?;
    assert_eq!(issued.status(), 200);

    let response = client
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body = response.text().await?;

    assert!(
        find_sample(&body, "ts_token_issuance_total", &[r#"status="success""#]).is_some(),
        "missing ts_token_issuance_total in:\n{}",
        body
    );
    assert!(
        find_sample(
            &body,
            "ts_http_requests_total",
            &[r#"endpoint="/api/v1/rtc/token""#, r#"status_code="200""#]
        )
        .is_some(),
        "missing ts_http_requests_total in:\n{}",
        body
    );
    assert!(!body.contains("room42"), "metrics must not carry channel names");

    Ok(())
}

/// Test that a rejected request shows up as a validation error.
#[tokio::test]
async fn test_metrics_endpoint_reports_validation_errors() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;
    let client = reqwest::Client::new();

    let rejected = client
        .post(format!("{}/api/v1/rtc/token", server.url()))
        .json(&serde_json::json!({"uid": 7}))
        .send()
        .await?;
    assert_eq!(rejected.status(), 400);

    let body = client
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?
        .text()
        .await?;

    assert!(
        find_sample(
            &body,
            "ts_errors_total",
            &[
                r#"operation="issue_token""#,
                r#"error_category="validation""#,
                r#"status_code="400""#,
            ]
        )
        .is_some(),
        "missing ts_errors_total in:\n{}",
        body
    );

    Ok(())
}

/// Test that non-existent routes return 404.
#[tokio::test]
async fn test_unknown_route_returns_404() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn().await?;

    let response = reqwest::get(format!("{}/does-not-exist", server.url())).await?;

    assert_eq!(response.status(), 404);

    Ok(())
}
