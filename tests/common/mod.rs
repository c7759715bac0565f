#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

use jobfit_api::auth::IdentityResolver;
use jobfit_api::database::models::{JobNote, JobPreference, Profile};
use jobfit_api::database::{DatabaseError, MemoryStore, ResourceStore};
use jobfit_api::{app, AppState};

pub const SECRET: &str = "integration-secret";

/// How a test request identifies itself
pub enum Caller<'a> {
    Anonymous,
    Header(&'a str),
    Bearer(String),
    RawAuthorization(&'a str),
    /// Both headers at once: `(x-user-id, raw Authorization value)`
    HeaderWithAuthorization(&'a str, &'a str),
}

/// A store whose database never answers
pub struct UnreachableStore;

fn unreachable<T>() -> Result<T, DatabaseError> {
    Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl ResourceStore for UnreachableStore {
    async fn get_profile(&self, _: &str) -> Result<Option<Profile>, DatabaseError> {
        unreachable()
    }
    async fn upsert_profile(&self, _: &Profile) -> Result<Profile, DatabaseError> {
        unreachable()
    }
    async fn get_preference(&self, _: &str) -> Result<Option<JobPreference>, DatabaseError> {
        unreachable()
    }
    async fn upsert_preference(&self, _: &JobPreference) -> Result<JobPreference, DatabaseError> {
        unreachable()
    }
    async fn list_notes(&self, _: &str) -> Result<Vec<JobNote>, DatabaseError> {
        unreachable()
    }
    async fn get_note(&self, _: &str) -> Result<Option<JobNote>, DatabaseError> {
        unreachable()
    }
    async fn insert_note(&self, _: &JobNote) -> Result<JobNote, DatabaseError> {
        unreachable()
    }
    async fn update_note(&self, _: &JobNote) -> Result<JobNote, DatabaseError> {
        unreachable()
    }
    async fn delete_note(&self, _: &str) -> Result<bool, DatabaseError> {
        unreachable()
    }
    async fn ping(&self) -> Result<(), DatabaseError> {
        unreachable()
    }
}

pub struct TestApp {
    router: Router,
    resolver: IdentityResolver,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_trusted_header(true)
    }

    pub fn with_trusted_header(allow: bool) -> Self {
        Self::build(allow, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn ResourceStore>) -> Self {
        Self::build(true, store)
    }

    fn build(allow: bool, store: Arc<dyn ResourceStore>) -> Self {
        let resolver = IdentityResolver::new(SECRET, "HS256", allow).expect("resolver");
        let state = AppState::new(IdentityResolver::new(SECRET, "HS256", allow).expect("resolver"), store);
        Self { router: app(state), resolver }
    }

    pub fn token_for(&self, user_id: &str) -> String {
        self.resolver.issue_token(user_id, Duration::hours(1)).expect("token")
    }

    pub async fn send(&self, method: Method, path: &str, caller: Caller<'_>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let body = match body {
            Some(json) => Some(serde_json::to_vec(&json)?),
            None => None,
        };
        self.dispatch(method, path, caller, body).await
    }

    /// Send `raw` verbatim as a JSON body, for malformed-payload tests
    pub async fn send_raw(&self, method: Method, path: &str, caller: Caller<'_>, raw: &str) -> Result<(StatusCode, Value)> {
        self.dispatch(method, path, caller, Some(raw.as_bytes().to_vec())).await
    }

    async fn dispatch(&self, method: Method, path: &str, caller: Caller<'_>, body: Option<Vec<u8>>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(path);
        builder = match caller {
            Caller::Anonymous => builder,
            Caller::Header(user_id) => builder.header("x-user-id", user_id),
            Caller::Bearer(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            Caller::RawAuthorization(value) => builder.header(header::AUTHORIZATION, value),
            Caller::HeaderWithAuthorization(user_id, value) => {
                builder.header("x-user-id", user_id).header(header::AUTHORIZATION, value)
            }
        };

        let request = match body {
            Some(bytes) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(bytes))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok((status, value))
    }
}
