use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::codec::CodecError;

/// Errors raised by the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot encode record: {0}")]
    Codec(#[from] CodecError),

    #[error("Corrupt stored record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS profiles (
        user_id     TEXT PRIMARY KEY,
        name        TEXT,
        role_target TEXT,
        skills      TEXT NOT NULL DEFAULT '',
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_preferences (
        user_id         TEXT PRIMARY KEY,
        locations       TEXT NOT NULL DEFAULT '',
        salary_min      BIGINT,
        salary_currency TEXT NOT NULL DEFAULT 'EUR',
        updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_notes (
        id         TEXT PRIMARY KEY,
        user_id    TEXT NOT NULL,
        job_url    TEXT NOT NULL,
        company    TEXT NOT NULL,
        title      TEXT NOT NULL,
        status     TEXT NOT NULL DEFAULT 'saved',
        tags       TEXT NOT NULL DEFAULT '',
        notes      TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS job_notes_user_created_idx ON job_notes (user_id, created_at DESC)",
];

/// Pool construction and schema bootstrap for the Postgres store
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool. Connections are pinged before being handed out so stale
    /// ones are replaced instead of failing the request.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        if config.url.is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }

        info!("Using DATABASE_URL: {}", Self::redacted_url(&config.url)?);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .test_before_acquire(true)
            .connect(&config.url)
            .await?;

        Self::health_check(&pool).await?;
        info!("Database connection OK");
        Ok(pool)
    }

    /// Create tables and indexes that do not exist yet
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }

    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Connection string with the password masked, safe to log
    pub fn redacted_url(raw: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("****"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
