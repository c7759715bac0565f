use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::codec::{decode_list, encode_list, CodecError};

/// Where an application stands. Any value may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    #[default]
    Saved,
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl NoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Saved => "saved",
            NoteStatus::Applied => "applied",
            NoteStatus::Interviewing => "interviewing",
            NoteStatus::Offer => "offer",
            NoteStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown note status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for NoteStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "saved" => Ok(NoteStatus::Saved),
            "applied" => Ok(NoteStatus::Applied),
            "interviewing" => Ok(NoteStatus::Interviewing),
            "offer" => Ok(NoteStatus::Offer),
            "rejected" => Ok(NoteStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A note about one job posting. Serialized as-is for `NoteRead` responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobNote {
    pub id: String,
    pub user_id: String,
    pub job_url: String,
    pub company: String,
    pub title: String,
    pub status: NoteStatus,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobNote {
    /// Fresh note owned by `user_id` with a new id and status `saved`
    pub fn new(user_id: impl Into<String>, input: NoteCreate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            job_url: input.job_url,
            company: input.company,
            title: input.title,
            status: NoteStatus::Saved,
            tags: input.tags,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every field present in `patch`
    pub fn apply(&mut self, patch: NotePatch) {
        if let Some(job_url) = patch.job_url {
            self.job_url = job_url;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

/// Body of `POST /notes`
#[derive(Debug, Clone, Deserialize)]
pub struct NoteCreate {
    pub job_url: String,
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `PATCH /notes/{id}`.
///
/// Absent fields stay untouched. `notes: null` clears the free-text notes.
/// Keys outside this set (`id`, `user_id`, timestamps, typos) are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotePatch {
    pub job_url: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub status: Option<NoteStatus>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

// Distinguishes `"notes": null` from a missing key
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// `job_notes` table row
#[derive(Debug, Clone, FromRow)]
pub struct NoteRow {
    pub id: String,
    pub user_id: String,
    pub job_url: String,
    pub company: String,
    pub title: String,
    pub status: String,
    pub tags: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&JobNote> for NoteRow {
    type Error = CodecError;

    fn try_from(n: &JobNote) -> Result<Self, Self::Error> {
        Ok(Self {
            id: n.id.clone(),
            user_id: n.user_id.clone(),
            job_url: n.job_url.clone(),
            company: n.company.clone(),
            title: n.title.clone(),
            status: n.status.as_str().to_string(),
            tags: encode_list(&n.tags)?,
            notes: n.notes.clone(),
            created_at: n.created_at,
            updated_at: n.updated_at,
        })
    }
}

impl TryFrom<NoteRow> for JobNote {
    type Error = UnknownStatus;

    fn try_from(row: NoteRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: row.status.parse()?,
            tags: decode_list(&row.tags),
            id: row.id,
            user_id: row.user_id,
            job_url: row.job_url,
            company: row.company,
            title: row.title,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
