use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::database::models::{JobPreference, PreferenceUpsert};
use crate::database::repository::ResourceStore;

use super::{check_list, ServiceError};

#[derive(Clone)]
pub struct PreferenceService {
    store: Arc<dyn ResourceStore>,
}

impl PreferenceService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, user_id: &str) -> Result<JobPreference, ServiceError> {
        self.store
            .get_preference(user_id)
            .await?
            .ok_or(ServiceError::NotFound("Preferences not found"))
    }

    pub async fn upsert(&self, user_id: &str, input: PreferenceUpsert) -> Result<JobPreference, ServiceError> {
        check_list("locations", &input.locations)?;

        let mut preference = self
            .store
            .get_preference(user_id)
            .await?
            .unwrap_or_else(|| JobPreference::empty(user_id));

        preference.locations = input.locations;
        preference.salary_min = input.salary_min;
        preference.salary_currency = input.salary_currency;
        preference.updated_at = Utc::now();

        let saved = self.store.upsert_preference(&preference).await?;
        debug!("Upserted preferences for {}", user_id);
        Ok(saved)
    }
}
