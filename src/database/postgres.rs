use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{JobNote, JobPreference, NoteRow, PreferenceRow, Profile, ProfileRow};
use crate::database::repository::ResourceStore;

/// Postgres-backed store. Every write is a single statement, so a record is
/// either fully written or not at all.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn note_from_row(row: NoteRow) -> Result<JobNote, DatabaseError> {
    let id = row.id.clone();
    JobNote::try_from(row).map_err(|e| DatabaseError::Corrupt(format!("job_notes/{}: {}", id, e)))
}

#[async_trait]
impl ResourceStore for PgStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DatabaseError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT user_id, name, role_target, skills, updated_at FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, DatabaseError> {
        let row = ProfileRow::try_from(profile)?;
        let saved = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (user_id, name, role_target, skills, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                name = EXCLUDED.name,
                role_target = EXCLUDED.role_target,
                skills = EXCLUDED.skills,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, name, role_target, skills, updated_at
            "#,
        )
        .bind(&row.user_id)
        .bind(&row.name)
        .bind(&row.role_target)
        .bind(&row.skills)
        .bind(row.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved.into())
    }

    async fn get_preference(&self, user_id: &str) -> Result<Option<JobPreference>, DatabaseError> {
        let row = sqlx::query_as::<_, PreferenceRow>(
            r#"
            SELECT user_id, locations, salary_min, salary_currency, updated_at
            FROM job_preferences WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(JobPreference::from))
    }

    async fn upsert_preference(&self, preference: &JobPreference) -> Result<JobPreference, DatabaseError> {
        let row = PreferenceRow::try_from(preference)?;
        let saved = sqlx::query_as::<_, PreferenceRow>(
            r#"
            INSERT INTO job_preferences (user_id, locations, salary_min, salary_currency, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                locations = EXCLUDED.locations,
                salary_min = EXCLUDED.salary_min,
                salary_currency = EXCLUDED.salary_currency,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, locations, salary_min, salary_currency, updated_at
            "#,
        )
        .bind(&row.user_id)
        .bind(&row.locations)
        .bind(row.salary_min)
        .bind(&row.salary_currency)
        .bind(row.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved.into())
    }

    async fn list_notes(&self, user_id: &str) -> Result<Vec<JobNote>, DatabaseError> {
        let rows = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, user_id, job_url, company, title, status, tags, notes, created_at, updated_at
            FROM job_notes
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(note_from_row).collect()
    }

    async fn get_note(&self, note_id: &str) -> Result<Option<JobNote>, DatabaseError> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT id, user_id, job_url, company, title, status, tags, notes, created_at, updated_at
            FROM job_notes WHERE id = $1
            "#,
        )
        .bind(note_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(note_from_row).transpose()
    }

    async fn insert_note(&self, note: &JobNote) -> Result<JobNote, DatabaseError> {
        let row = NoteRow::try_from(note)?;
        let saved = sqlx::query_as::<_, NoteRow>(
            r#"
            INSERT INTO job_notes (id, user_id, job_url, company, title, status, tags, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, job_url, company, title, status, tags, notes, created_at, updated_at
            "#,
        )
        .bind(&row.id)
        .bind(&row.user_id)
        .bind(&row.job_url)
        .bind(&row.company)
        .bind(&row.title)
        .bind(&row.status)
        .bind(&row.tags)
        .bind(&row.notes)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&self.pool)
        .await?;

        note_from_row(saved)
    }

    async fn update_note(&self, note: &JobNote) -> Result<JobNote, DatabaseError> {
        let row = NoteRow::try_from(note)?;

        // user_id and created_at are fixed at insert time
        let saved = sqlx::query_as::<_, NoteRow>(
            r#"
            UPDATE job_notes SET
                job_url = $2,
                company = $3,
                title = $4,
                status = $5,
                tags = $6,
                notes = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING id, user_id, job_url, company, title, status, tags, notes, created_at, updated_at
            "#,
        )
        .bind(&row.id)
        .bind(&row.job_url)
        .bind(&row.company)
        .bind(&row.title)
        .bind(&row.status)
        .bind(&row.tags)
        .bind(&row.notes)
        .bind(row.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("job_notes/{}", row.id)))?;

        note_from_row(saved)
    }

    async fn delete_note(&self, note_id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM job_notes WHERE id = $1")
            .bind(note_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
