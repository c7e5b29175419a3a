use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::entities::Session;
use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::auth::ports::SessionRepository;
use crate::domain::auth::value_objects::TokenHash;

/// Statements creating the sessions table; run after the users schema
pub const SCHEMA: &[&str] = &[
  r#"
  CREATE TABLE IF NOT EXISTS sessions (
      id UUID PRIMARY KEY,
      user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
      token_hash TEXT NOT NULL UNIQUE,
      expires_at TIMESTAMPTZ NOT NULL,
      created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
  )
  "#,
  "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions (expires_at)",
];

/// Database row structure for sessions table
#[derive(Debug, FromRow)]
struct SessionRow {
  id: Uuid,
  user_id: i64,
  token_hash: String,
  expires_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
  fn from(row: SessionRow) -> Self {
    Session::from_db(
      row.id,
      row.user_id,
      row.token_hash,
      row.expires_at,
      row.created_at,
    )
  }
}

/// PostgreSQL implementation of the SessionRepository trait
pub struct PostgresSessionRepository {
  pool: PgPool,
}

impl PostgresSessionRepository {
  /// Creates a new PostgresSessionRepository with the given connection pool
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
  async fn create(&self, session: Session) -> Result<Session, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
    )
    .bind(session.id)
    .bind(session.user_id.value())
    .bind(&session.token_hash)
    .bind(session.expires_at)
    .bind(session.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create session: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.into())
  }

  async fn find_by_token_hash(&self, token_hash: &TokenHash) -> Result<Option<Session>, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1
            "#,
    )
    .bind(token_hash.as_str())
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find session by token hash: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.map(Session::from))
  }

  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError> {
    let result = sqlx::query(
      r#"
            DELETE FROM sessions
            WHERE id = $1
            "#,
    )
    .bind(session_id)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to delete session: {}", e);
      AuthError::from(e)
    })?;

    if result.rows_affected() == 0 {
      tracing::warn!("Session {} not found for deletion", session_id);
      return Err(AuthError::Repository(RepositoryError::NotFound));
    }

    Ok(())
  }

  async fn delete_expired(&self) -> Result<u64, AuthError> {
    let result = sqlx::query(
      r#"
            DELETE FROM sessions
            WHERE expires_at <= NOW()
            "#,
    )
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to purge expired sessions: {}", e);
      AuthError::from(e)
    })?;

    Ok(result.rows_affected())
  }
}
