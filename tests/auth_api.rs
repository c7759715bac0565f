mod common;

use anyhow::Result;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{Caller, TestApp, UnreachableStore};

#[tokio::test]
async fn health_needs_no_credentials() -> Result<()> {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", Caller::Anonymous, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_database() -> Result<()> {
    let app = TestApp::with_store(Arc::new(UnreachableStore));
    let (status, body) = app.send(Method::GET, "/health", Caller::Anonymous, None).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "ok": false, "error": "database unavailable" }));

    // Resource routes surface the outage as 503 too
    let (status, body) = app.send(Method::GET, "/notes", Caller::Header("u1"), None).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    Ok(())
}

#[tokio::test]
async fn missing_credentials_are_rejected() -> Result<()> {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/notes", Caller::Anonymous, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No credentials provided");
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn bearer_token_identifies_caller() -> Result<()> {
    let app = TestApp::new();
    let token = app.token_for("u1");

    let (status, note) = app
        .send(
            Method::POST,
            "/notes",
            Caller::Bearer(token.clone()),
            Some(json!({ "job_url": "https://x.test/1", "company": "Acme", "title": "SWE" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["user_id"], "u1");

    // Same user through the trusted header sees the note
    let (_, listed) = app.send(Method::GET, "/notes", Caller::Header("u1"), None).await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn tampered_token_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let mut token = app.token_for("u1");
    // Corrupt the payload segment
    let dot = token.find('.').unwrap_or(0);
    token.insert_str(dot + 1, "xyz");

    let (status, body) = app.send(Method::GET, "/notes", Caller::Bearer(token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap_or_default().starts_with("Invalid token:"));
    Ok(())
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let foreign = jobfit_api::auth::IdentityResolver::new("someone-else", "HS256", true)?
        .issue_token("u1", chrono::Duration::hours(1))?;

    let (status, _) = app.send(Method::GET, "/profile", Caller::Bearer(foreign), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn wrong_scheme_does_not_fall_back_to_header() -> Result<()> {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::GET, "/notes", Caller::RawAuthorization("Basic dXNlcjpwYXNz"), None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token: Invalid auth scheme");
    Ok(())
}

#[tokio::test]
async fn empty_authorization_falls_back_to_header() -> Result<()> {
    let app = TestApp::new();
    for raw in ["", "   "] {
        let (status, body) = app
            .send(Method::GET, "/profile", Caller::HeaderWithAuthorization("abc", raw), None)
            .await?;
        // Authenticated as abc, who has no profile yet
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Profile not found");
    }
    Ok(())
}

#[tokio::test]
async fn double_space_before_token_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let header = format!("Bearer  {}", app.token_for("u1"));
    let (status, body) = app
        .send(Method::GET, "/notes", Caller::HeaderWithAuthorization("u1", &header), None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap_or_default().starts_with("Invalid token:"));
    Ok(())
}

#[tokio::test]
async fn trusted_header_can_be_disabled() -> Result<()> {
    let app = TestApp::with_trusted_header(false);
    let (status, _) = app.send(Method::GET, "/notes", Caller::Header("abc"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.token_for("abc");
    let (status, _) = app.send(Method::GET, "/notes", Caller::Bearer(token), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
