pub mod note_service;
pub mod preference_service;
pub mod profile_service;

pub use note_service::NoteService;
pub use preference_service::PreferenceService;
pub use profile_service::ProfileService;

use crate::database::codec::{validate_list, CodecError};
use crate::database::manager::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Absent, or owned by someone else. The two are deliberately indistinguishable.
    #[error("{0}")]
    NotFound(&'static str),

    #[error("Invalid '{field}': {message}")]
    Validation { field: &'static str, message: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Fail early, naming the field, if a list would not survive storage
pub(crate) fn check_list(field: &'static str, values: &[String]) -> Result<(), ServiceError> {
    validate_list(values).map_err(|e: CodecError| ServiceError::Validation {
        field,
        message: e.to_string(),
    })
}
