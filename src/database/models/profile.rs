use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::codec::{decode_list, encode_list, CodecError};

/// One profile per user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub name: Option<String>,
    pub role_target: Option<String>,
    pub skills: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            role_target: None,
            skills: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

/// Body of `POST /profile`. Unknown keys (including `user_id`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpsert {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role_target: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// `profiles` table row
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: String,
    pub name: Option<String>,
    pub role_target: Option<String>,
    pub skills: String,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Profile> for ProfileRow {
    type Error = CodecError;

    fn try_from(p: &Profile) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: p.user_id.clone(),
            name: p.name.clone(),
            role_target: p.role_target.clone(),
            skills: encode_list(&p.skills)?,
            updated_at: p.updated_at,
        })
    }
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            name: row.name,
            role_target: row.role_target,
            skills: decode_list(&row.skills),
            updated_at: row.updated_at,
        }
    }
}
