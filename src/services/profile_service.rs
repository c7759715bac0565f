use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::database::models::{Profile, ProfileUpsert};
use crate::database::repository::ResourceStore;

use super::{check_list, ServiceError};

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ResourceStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, user_id: &str) -> Result<Profile, ServiceError> {
        self.store
            .get_profile(user_id)
            .await?
            .ok_or(ServiceError::NotFound("Profile not found"))
    }

    /// Create or overwrite the caller's profile. The stored `user_id` is always the caller.
    pub async fn upsert(&self, user_id: &str, input: ProfileUpsert) -> Result<Profile, ServiceError> {
        check_list("skills", &input.skills)?;

        let mut profile = self
            .store
            .get_profile(user_id)
            .await?
            .unwrap_or_else(|| Profile::empty(user_id));

        profile.name = input.name;
        profile.role_target = input.role_target;
        profile.skills = input.skills;
        profile.updated_at = Utc::now();

        let saved = self.store.upsert_profile(&profile).await?;
        debug!("Upserted profile for {}", user_id);
        Ok(saved)
    }
}
