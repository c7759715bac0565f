use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};

use crate::database::models::{JobPreference, PreferenceUpsert};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// GET /preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<JobPreference>, ApiError> {
    Ok(Json(state.preferences.get(&user.user_id).await?))
}

/// POST /preferences - create or replace the caller's preferences
pub async fn upsert_preferences(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<PreferenceUpsert>, JsonRejection>,
) -> Result<Json<JobPreference>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.preferences.upsert(&user.user_id, input).await?))
}
