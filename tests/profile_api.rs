mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{Caller, TestApp};

#[tokio::test]
async fn profile_missing_until_upserted() -> Result<()> {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/profile", Caller::Header("u1"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Profile not found");
    Ok(())
}

#[tokio::test]
async fn second_profile_upsert_wins() -> Result<()> {
    let app = TestApp::new();
    app.send(
        Method::POST,
        "/profile",
        Caller::Header("u1"),
        Some(json!({ "name": "Ada", "role_target": "SWE", "skills": ["rust"] })),
    )
    .await?;

    let (status, second) = app
        .send(
            Method::POST,
            "/profile",
            Caller::Header("u1"),
            Some(json!({ "name": "Ada L.", "skills": ["rust", "postgres"] })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, stored) = app.send(Method::GET, "/profile", Caller::Header("u1"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, second);
    assert_eq!(stored["name"], "Ada L.");
    assert_eq!(stored["role_target"], json!(null));
    assert_eq!(stored["skills"], json!(["rust", "postgres"]));
    Ok(())
}

#[tokio::test]
async fn payload_cannot_claim_another_user() -> Result<()> {
    let app = TestApp::new();
    let (status, profile) = app
        .send(
            Method::POST,
            "/profile",
            Caller::Header("u1"),
            Some(json!({ "user_id": "victim", "name": "Mallory", "skills": [] })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["user_id"], "u1");

    let (status, _) = app.send(Method::GET, "/profile", Caller::Header("victim"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn preferences_default_currency() -> Result<()> {
    let app = TestApp::new();
    let (status, _) = app.send(Method::GET, "/preferences", Caller::Header("u1"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, prefs) = app
        .send(
            Method::POST,
            "/preferences",
            Caller::Header("u1"),
            Some(json!({ "locations": ["Berlin", "Remote"], "salary_min": 65000 })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["salary_currency"], "EUR");

    let (_, stored) = app.send(Method::GET, "/preferences", Caller::Header("u1"), None).await?;
    assert_eq!(stored["locations"], json!(["Berlin", "Remote"]));
    assert_eq!(stored["salary_min"], 65000);
    Ok(())
}

#[tokio::test]
async fn preferences_reject_location_with_comma() -> Result<()> {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/preferences",
            Caller::Header("u1"),
            Some(json!({ "locations": ["Paris, FR"], "salary_currency": "EUR" })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["locations"].is_string());
    Ok(())
}
