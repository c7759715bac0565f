use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{JobNote, JobPreference, Profile};

/// Keyed storage for profiles, preferences and notes.
///
/// This is a plain table: it never checks who owns a record. Callers
/// (the services) are responsible for scoping every call to the caller.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DatabaseError>;

    /// Insert or fully replace the profile keyed by `profile.user_id`
    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, DatabaseError>;

    async fn get_preference(&self, user_id: &str) -> Result<Option<JobPreference>, DatabaseError>;

    async fn upsert_preference(&self, preference: &JobPreference) -> Result<JobPreference, DatabaseError>;

    /// Notes owned by `user_id`, newest `created_at` first
    async fn list_notes(&self, user_id: &str) -> Result<Vec<JobNote>, DatabaseError>;

    async fn get_note(&self, note_id: &str) -> Result<Option<JobNote>, DatabaseError>;

    async fn insert_note(&self, note: &JobNote) -> Result<JobNote, DatabaseError>;

    /// Full replace by id. Fails with `NotFound` if the row vanished.
    async fn update_note(&self, note: &JobNote) -> Result<JobNote, DatabaseError>;

    /// Returns whether a row was removed
    async fn delete_note(&self, note_id: &str) -> Result<bool, DatabaseError>;

    /// Liveness probe
    async fn ping(&self) -> Result<(), DatabaseError>;
}
