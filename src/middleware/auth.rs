use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthError, TRUSTED_USER_HEADER};
use crate::error::ApiError;
use crate::AppState;

/// The caller every protected handler acts on behalf of
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

/// Resolve the caller from `Authorization` / `X-User-Id` and inject `AuthUser`
/// into the request, or answer 401.
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = resolve_headers(&state, request.headers()).map_err(|e| {
        tracing::debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}

fn resolve_headers(state: &AppState, headers: &HeaderMap) -> Result<String, AuthError> {
    let authorization = headers
        .get(AUTHORIZATION)
        .map(|v| {
            v.to_str()
                .map_err(|_| AuthError::InvalidToken("Invalid Authorization header format".to_string()))
        })
        .transpose()?;

    // An unreadable trusted header counts as absent
    let trusted_user = headers
        .get(TRUSTED_USER_HEADER)
        .and_then(|v| v.to_str().ok());

    state.resolver.resolve(authorization, trusted_user)
}
