use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use thiserror::Error;

use super::config::DatabaseConfig;

/// Errors that stop a service from starting
#[derive(Debug, Error)]
pub enum StartupError {
  #[error("Configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("Database connection timed out after {0} seconds")]
  Timeout(u64),

  #[error("Could not connect to database at {target}: {source}")]
  Connect {
    target: String,
    #[source]
    source: sqlx::Error,
  },

  #[error("Failed to create schema: {0}")]
  Schema(#[source] sqlx::Error),

  #[error("Template error: {0}")]
  Templates(#[from] tera::Error),
}

impl From<StartupError> for std::io::Error {
  fn from(error: StartupError) -> Self {
    let kind = match &error {
      StartupError::Timeout(_) => std::io::ErrorKind::TimedOut,
      StartupError::Connect { .. } => std::io::ErrorKind::ConnectionRefused,
      StartupError::Config(_) => std::io::ErrorKind::InvalidInput,
      _ => std::io::ErrorKind::Other,
    };
    std::io::Error::new(kind, error.to_string())
  }
}

/// Opens the connection pool, bounded by the configured connect timeout
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StartupError> {
  let target = config.display_target();
  tracing::info!("Connecting to database: {}", target);

  let pool = tokio::time::timeout(
    Duration::from_secs(config.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.max_connections)
      .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
      .connect_with(config.connect_options()),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.connect_timeout_seconds
    );
    StartupError::Timeout(config.connect_timeout_seconds)
  })?
  .map_err(|source| {
    tracing::error!("Failed to connect to database: {}", source);
    StartupError::Connect {
      target: target.clone(),
      source,
    }
  })?;

  tracing::info!("Database connection pool created");
  Ok(pool)
}

/// Runs idempotent `CREATE TABLE IF NOT EXISTS` statements in order
pub async fn ensure_schema(pool: &PgPool, statements: &[&str]) -> Result<(), StartupError> {
  for statement in statements {
    sqlx::query(statement)
      .execute(pool)
      .await
      .map_err(StartupError::Schema)?;
  }
  Ok(())
}
