use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::database::models::{JobNote, NoteCreate, NotePatch};
use crate::database::repository::ResourceStore;

use super::{check_list, ServiceError};

const NOTE_NOT_FOUND: &str = "Note not found";

/// Owner-scoped operations on job notes.
///
/// Every call re-reads the note; nothing is cached between requests. Two
/// patches racing on one note are last-write-wins.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn ResourceStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<JobNote>, ServiceError> {
        Ok(self.store.list_notes(user_id).await?)
    }

    pub async fn create(&self, user_id: &str, input: NoteCreate) -> Result<JobNote, ServiceError> {
        check_list("tags", &input.tags)?;

        let note = JobNote::new(user_id, input);
        let saved = self.store.insert_note(&note).await?;
        debug!("Created note {} for {}", saved.id, user_id);
        Ok(saved)
    }

    pub async fn patch(&self, user_id: &str, note_id: &str, patch: NotePatch) -> Result<JobNote, ServiceError> {
        if let Some(tags) = &patch.tags {
            check_list("tags", tags)?;
        }

        let mut note = self.owned_note(user_id, note_id).await?;
        note.apply(patch);
        note.updated_at = Utc::now();

        Ok(self.store.update_note(&note).await?)
    }

    pub async fn delete(&self, user_id: &str, note_id: &str) -> Result<(), ServiceError> {
        self.owned_note(user_id, note_id).await?;

        if self.store.delete_note(note_id).await? {
            debug!("Deleted note {} for {}", note_id, user_id);
            Ok(())
        } else {
            // Removed by a concurrent request between the check and the delete
            Err(ServiceError::NotFound(NOTE_NOT_FOUND))
        }
    }

    /// Load a note only if `user_id` owns it
    async fn owned_note(&self, user_id: &str, note_id: &str) -> Result<JobNote, ServiceError> {
        match self.store.get_note(note_id).await? {
            Some(note) if note.user_id == user_id => Ok(note),
            Some(_) => {
                debug!("User {} attempted to access note {} owned by another user", user_id, note_id);
                Err(ServiceError::NotFound(NOTE_NOT_FOUND))
            }
            None => Err(ServiceError::NotFound(NOTE_NOT_FOUND)),
        }
    }
}
