//! In-memory fakes and fixtures shared by unit tests

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use testcontainers::ImageExt;
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};
use uuid::Uuid;

use crate::domain::RepositoryError;
use crate::domain::auth::{
  AuthService, AuthServiceConfig, AuthError, NewUser, Session, User,
  ports::{SessionRepository, UserRepository},
  value_objects::{Email, TokenHash, UserId},
};
use crate::domain::catalog::{Book, BookRepository, CatalogError, NewBook};
use crate::infrastructure::persistence::postgres::{
  book_repository, session_repository, user_repository,
};
use crate::infrastructure::security::Argon2PasswordHasher;

#[derive(Default)]
pub struct InMemoryUserRepository {
  users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
  pub fn len(&self) -> usize {
    self.users.lock().unwrap().len()
  }

  /// Stores a row whose password column holds plaintext
  pub fn insert_raw(&self, email: &str, password: &str, name: &str) -> User {
    let mut users = self.users.lock().unwrap();
    let user = User::from_db(
      users.len() as i64 + 1,
      email.to_string(),
      password.to_string(),
      name.to_string(),
      Utc::now(),
    );
    users.push(user.clone());
    user
  }

  pub fn remove(&self, id: UserId) {
    self.users.lock().unwrap().retain(|u| u.id != id);
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: NewUser) -> Result<User, AuthError> {
    let mut users = self.users.lock().unwrap();
    if users.iter().any(|u| u.email == user.email.as_str()) {
      return Err(AuthError::Repository(RepositoryError::DuplicateKey(
        "users_email_key".to_string(),
      )));
    }

    let next_id = users.iter().map(|u| u.id.value()).max().unwrap_or(0) + 1;
    let created = User::from_db(
      next_id,
      user.email.into_inner(),
      user.password_hash.into_inner(),
      user.name.into_inner(),
      Utc::now(),
    );
    users.push(created.clone());
    Ok(created)
  }

  async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
    let users = self.users.lock().unwrap();
    Ok(users.iter().find(|u| u.id == id).cloned())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let users = self.users.lock().unwrap();
    Ok(users.iter().find(|u| u.email == email.as_str()).cloned())
  }
}

/// Loses the race against a concurrent registration: the email lookup sees
/// nothing, then the insert hits the unique constraint
#[derive(Default)]
pub struct RacingUserRepository {
  pub inner: InMemoryUserRepository,
}

#[async_trait]
impl UserRepository for RacingUserRepository {
  async fn create(&self, user: NewUser) -> Result<User, AuthError> {
    self.inner.create(user).await
  }

  async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
    self.inner.find_by_id(id).await
  }

  async fn find_by_email(&self, _email: &Email) -> Result<Option<User>, AuthError> {
    Ok(None)
  }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
  sessions: Mutex<HashMap<Uuid, Session>>,
}

impl InMemorySessionRepository {
  pub fn len(&self) -> usize {
    self.sessions.lock().unwrap().len()
  }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
  async fn create(&self, session: Session) -> Result<Session, AuthError> {
    self
      .sessions
      .lock()
      .unwrap()
      .insert(session.id, session.clone());
    Ok(session)
  }

  async fn find_by_token_hash(&self, token_hash: &TokenHash) -> Result<Option<Session>, AuthError> {
    let sessions = self.sessions.lock().unwrap();
    Ok(
      sessions
        .values()
        .find(|s| s.token_hash == token_hash.as_str())
        .cloned(),
    )
  }

  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError> {
    match self.sessions.lock().unwrap().remove(&session_id) {
      Some(_) => Ok(()),
      None => Err(AuthError::Repository(RepositoryError::NotFound)),
    }
  }

  async fn delete_expired(&self) -> Result<u64, AuthError> {
    let mut sessions = self.sessions.lock().unwrap();
    let before = sessions.len();
    sessions.retain(|_, s| !s.is_expired());
    Ok((before - sessions.len()) as u64)
  }
}

#[derive(Default)]
pub struct InMemoryBookRepository {
  books: Mutex<Vec<Book>>,
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
  async fn list_all(&self) -> Result<Vec<Book>, CatalogError> {
    Ok(self.books.lock().unwrap().clone())
  }

  async fn create(&self, book: NewBook) -> Result<Book, CatalogError> {
    let mut books = self.books.lock().unwrap();
    if books.iter().any(|b| b.title == book.title.as_str()) {
      return Err(CatalogError::Repository(RepositoryError::DuplicateKey(
        "books_title_key".to_string(),
      )));
    }

    let created = Book {
      id: books.len() as i64 + 1,
      title: book.title.as_str().to_string(),
      author: book.author.as_str().to_string(),
      rating: book.rating.value(),
    };
    books.push(created.clone());
    Ok(created)
  }
}

/// Argon2 with the smallest parameters the algorithm accepts
pub fn fast_hasher() -> Arc<Argon2PasswordHasher> {
  Arc::new(Argon2PasswordHasher::new(256, 1, 1).unwrap())
}

pub fn auth_service() -> (
  Arc<AuthService>,
  Arc<InMemoryUserRepository>,
  Arc<InMemorySessionRepository>,
) {
  let users = Arc::new(InMemoryUserRepository::default());
  let sessions = Arc::new(InMemorySessionRepository::default());
  let service = AuthService::new(
    users.clone(),
    sessions.clone(),
    fast_hasher(),
    AuthServiceConfig::default(),
  );

  (Arc::new(service), users, sessions)
}

/// Auth service whose user lookups always lose the registration race
pub fn racing_auth_service() -> (
  Arc<AuthService>,
  Arc<RacingUserRepository>,
  Arc<InMemorySessionRepository>,
) {
  let users = Arc::new(RacingUserRepository::default());
  let sessions = Arc::new(InMemorySessionRepository::default());
  let service = AuthService::new(
    users.clone(),
    sessions.clone(),
    fast_hasher(),
    AuthServiceConfig::default(),
  );

  (Arc::new(service), users, sessions)
}

/// Starts a throwaway PostgreSQL and creates every table
pub async fn postgres_test_pool() -> (PgPool, ContainerAsync<Postgres>) {
  let container = Postgres::default()
    .with_tag("16-alpine")
    .start()
    .await
    .expect("Failed to start postgres container");

  let host = container.get_host().await.expect("Failed to get host");
  let port = container
    .get_host_port_ipv4(5432)
    .await
    .expect("Failed to get port");
  let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

  let pool = sqlx::postgres::PgPoolOptions::new()
    .max_connections(5)
    .connect(&database_url)
    .await
    .expect("Failed to connect to test database");

  for schema in [
    book_repository::SCHEMA,
    user_repository::SCHEMA,
    session_repository::SCHEMA,
  ] {
    crate::infrastructure::database::ensure_schema(&pool, schema)
      .await
      .expect("Failed to create schema");
  }

  (pool, container)
}
