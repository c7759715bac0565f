use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{JobNote, JobPreference, NoteRow, PreferenceRow, Profile, ProfileRow};
use crate::database::repository::ResourceStore;

/// In-process store used by tests and `--memory` runs.
///
/// Records are kept in their encoded row form so list fields go through the
/// same codec as the Postgres backend. Each table has its own lock, held only
/// for the map operation itself.
#[derive(Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<RwLock<HashMap<String, ProfileRow>>>,
    preferences: Arc<RwLock<HashMap<String, PreferenceRow>>>,
    // (insertion sequence, row); the sequence breaks created_at ties
    notes: Arc<RwLock<HashMap<String, (u64, NoteRow)>>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn note_from_row(row: NoteRow) -> Result<JobNote, DatabaseError> {
    JobNote::try_from(row).map_err(|e| DatabaseError::Corrupt(e.to_string()))
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DatabaseError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(user_id).cloned().map(Profile::from))
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, DatabaseError> {
        let row = ProfileRow::try_from(profile)?;
        self.profiles.write().await.insert(row.user_id.clone(), row.clone());
        Ok(row.into())
    }

    async fn get_preference(&self, user_id: &str) -> Result<Option<JobPreference>, DatabaseError> {
        let preferences = self.preferences.read().await;
        Ok(preferences.get(user_id).cloned().map(JobPreference::from))
    }

    async fn upsert_preference(&self, preference: &JobPreference) -> Result<JobPreference, DatabaseError> {
        let row = PreferenceRow::try_from(preference)?;
        self.preferences.write().await.insert(row.user_id.clone(), row.clone());
        Ok(row.into())
    }

    async fn list_notes(&self, user_id: &str) -> Result<Vec<JobNote>, DatabaseError> {
        let mut owned: Vec<(u64, NoteRow)> = {
            let notes = self.notes.read().await;
            notes
                .values()
                .filter(|(_, row)| row.user_id == user_id)
                .cloned()
                .collect()
        };

        owned.sort_by(|(seq_a, a), (seq_b, b)| b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a)));
        owned.into_iter().map(|(_, row)| note_from_row(row)).collect()
    }

    async fn get_note(&self, note_id: &str) -> Result<Option<JobNote>, DatabaseError> {
        let row = self.notes.read().await.get(note_id).map(|(_, row)| row.clone());
        row.map(note_from_row).transpose()
    }

    async fn insert_note(&self, note: &JobNote) -> Result<JobNote, DatabaseError> {
        let row = NoteRow::try_from(note)?;
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.notes.write().await.insert(row.id.clone(), (seq, row.clone()));
        note_from_row(row)
    }

    async fn update_note(&self, note: &JobNote) -> Result<JobNote, DatabaseError> {
        let mut row = NoteRow::try_from(note)?;
        let mut notes = self.notes.write().await;
        let (_, stored) = notes
            .get_mut(&row.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("job_notes/{}", row.id)))?;

        // user_id and created_at are fixed at insert time
        row.user_id = stored.user_id.clone();
        row.created_at = stored.created_at;
        *stored = row.clone();
        drop(notes);

        note_from_row(row)
    }

    async fn delete_note(&self, note_id: &str) -> Result<bool, DatabaseError> {
        Ok(self.notes.write().await.remove(note_id).is_some())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
