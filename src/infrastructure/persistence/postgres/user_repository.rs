use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::auth::{
  entities::{NewUser, User},
  errors::AuthError,
  ports::UserRepository,
  value_objects::{Email, UserId},
};

/// Statements creating the users table
pub const SCHEMA: &[&str] = &[r#"
  CREATE TABLE IF NOT EXISTS users (
      id BIGSERIAL PRIMARY KEY,
      email VARCHAR(100) NOT NULL UNIQUE,
      password TEXT NOT NULL,
      name VARCHAR(1000) NOT NULL,
      created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
  )
  "#];

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: i64,
  email: String,
  password: String,
  name: String,
  created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(row.id, row.email, row.password, row.name, row.created_at)
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: NewUser) -> Result<User, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (email, password, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password, name, created_at
            "#,
    )
    .bind(user.email.as_str())
    .bind(user.password_hash.as_str())
    .bind(user.name.as_str())
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }

  async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password, name, created_at
            FROM users
            WHERE id = $1
            "#,
    )
    .bind(id.value())
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(User::from))
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password, name, created_at
            FROM users
            WHERE email = $1
            "#,
    )
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(User::from))
  }
}
