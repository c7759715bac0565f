use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};

use crate::database::models::{Profile, ProfileUpsert};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// GET /profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.profiles.get(&user.user_id).await?))
}

/// POST /profile - create or replace the caller's profile
pub async fn upsert_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ProfileUpsert>, JsonRejection>,
) -> Result<Json<Profile>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.profiles.upsert(&user.user_id, input).await?))
}
