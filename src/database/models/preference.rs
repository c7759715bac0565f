use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::codec::{decode_list, encode_list, CodecError};

pub const DEFAULT_SALARY_CURRENCY: &str = "EUR";

fn default_currency() -> String {
    DEFAULT_SALARY_CURRENCY.to_string()
}

/// Job-search preferences, one per user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPreference {
    pub user_id: String,
    pub locations: Vec<String>,
    pub salary_min: Option<i64>,
    pub salary_currency: String,
    pub updated_at: DateTime<Utc>,
}

impl JobPreference {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            locations: Vec::new(),
            salary_min: None,
            salary_currency: default_currency(),
            updated_at: Utc::now(),
        }
    }
}

/// Body of `POST /preferences`
#[derive(Debug, Clone, Deserialize)]
pub struct PreferenceUpsert {
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default = "default_currency")]
    pub salary_currency: String,
}

impl Default for PreferenceUpsert {
    fn default() -> Self {
        Self {
            locations: Vec::new(),
            salary_min: None,
            salary_currency: default_currency(),
        }
    }
}

/// `job_preferences` table row
#[derive(Debug, Clone, FromRow)]
pub struct PreferenceRow {
    pub user_id: String,
    pub locations: String,
    pub salary_min: Option<i64>,
    pub salary_currency: String,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&JobPreference> for PreferenceRow {
    type Error = CodecError;

    fn try_from(p: &JobPreference) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: p.user_id.clone(),
            locations: encode_list(&p.locations)?,
            salary_min: p.salary_min,
            salary_currency: p.salary_currency.clone(),
            updated_at: p.updated_at,
        })
    }
}

impl From<PreferenceRow> for JobPreference {
    fn from(row: PreferenceRow) -> Self {
        Self {
            user_id: row.user_id,
            locations: decode_list(&row.locations),
            salary_min: row.salary_min,
            salary_currency: row.salary_currency,
            updated_at: row.updated_at,
        }
    }
}
