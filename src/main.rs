use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jobfit_api::auth::IdentityResolver;
use jobfit_api::config::AppConfig;
use jobfit_api::database::{DatabaseManager, MemoryStore, PgStore, ResourceStore};
use jobfit_api::server;

#[derive(Parser)]
#[command(name = "jobfit-api", version, about = "Job-search tracking API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,
        /// Keep data in process memory instead of Postgres (lost on exit)
        #[arg(long)]
        memory: bool,
    },
    /// Create missing tables and exit
    Migrate,
    /// Print a signed bearer token for a user id
    Token {
        #[arg(long)]
        sub: String,
        /// Lifetime in hours (defaults to JWT_EXPIRY_HOURS)
        #[arg(long)]
        hours: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobfit_api=info,tower_http=info")),
        )
        .init();

    let mut config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting JobFit API in {:?} mode", config.environment);

    match Cli::parse().command.unwrap_or(Command::Serve { port: None, memory: false }) {
        Command::Serve { port, memory } => {
            if let Some(port) = port {
                config.server.port = port;
            }

            let store: Arc<dyn ResourceStore> = if memory {
                tracing::warn!("Using in-memory store; data is lost on exit");
                Arc::new(MemoryStore::new())
            } else {
                let pool = DatabaseManager::connect(&config.database).await?;
                DatabaseManager::ensure_schema(&pool).await?;
                Arc::new(PgStore::new(pool))
            };

            server::serve(&config, store).await
        }
        Command::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::ensure_schema(&pool).await?;
            pool.close().await;
            Ok(())
        }
        Command::Token { sub, hours } => {
            let resolver = IdentityResolver::from_config(&config.security)?;
            let hours = match hours {
                Some(hours) => hours,
                None => i64::try_from(config.security.jwt_expiry_hours).context("JWT_EXPIRY_HOURS is out of range")?,
            };
            let ttl = Duration::try_hours(hours).context("--hours is out of range")?;
            println!("{}", resolver.issue_token(&sub, ttl)?);
            Ok(())
        }
    }
}
