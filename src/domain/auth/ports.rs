use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{NewUser, Session, User};
use super::errors::AuthError;
use super::value_objects::{Email, Password, PasswordHash, TokenHash, UserId};

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Inserts a new user; a taken email surfaces as
  /// `RepositoryError::DuplicateKey`
  async fn create(&self, user: NewUser) -> Result<User, AuthError>;

  /// Finds a user by primary key
  async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;
}

/// Repository trait for session persistence operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
  /// Creates a new session in the repository
  async fn create(&self, session: Session) -> Result<Session, AuthError>;

  /// Finds a session by its token hash
  async fn find_by_token_hash(&self, token_hash: &TokenHash) -> Result<Option<Session>, AuthError>;

  /// Deletes a specific session
  async fn delete(&self, session_id: Uuid) -> Result<(), AuthError>;

  /// Removes every session whose expiry has passed, returning how many went
  async fn delete_expired(&self) -> Result<u64, AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password with a fresh random salt
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a hashed password
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}
