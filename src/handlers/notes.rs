use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::database::models::{JobNote, NoteCreate, NotePatch};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

/// GET /notes - the caller's notes, newest first
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<JobNote>>, ApiError> {
    Ok(Json(state.notes.list(&user.user_id).await?))
}

/// POST /notes
pub async fn create_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NoteCreate>, JsonRejection>,
) -> Result<Json<JobNote>, ApiError> {
    let Json(input) = payload?;
    Ok(Json(state.notes.create(&user.user_id, input).await?))
}

/// PATCH /notes/:id - 404 for missing notes and for notes owned by someone else
pub async fn patch_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(note_id): Path<String>,
    payload: Result<Json<NotePatch>, JsonRejection>,
) -> Result<Json<JobNote>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(state.notes.patch(&user.user_id, &note_id, patch).await?))
}

/// DELETE /notes/:id
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(note_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.notes.delete(&user.user_id, &note_id).await?;
    Ok(Json(json!({ "deleted": true })))
}
