use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;
use super::value_objects::{DisplayName, Email, PasswordHash, TokenHash, UserId};

/// User entity representing a registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  /// Database identity
  pub id: UserId,
  /// User's email address (unique)
  pub email: String,
  /// Salted Argon2 hash in PHC format, never the plaintext
  pub password_hash: String,
  /// Name shown on the protected page
  pub name: String,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
}

impl User {
  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(
    id: i64,
    email: String,
    password_hash: String,
    name: String,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: UserId::new(id),
      email,
      password_hash,
      name,
      created_at,
    }
  }
}

/// A user that has not been persisted yet; the id is assigned by storage
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email: Email,
  pub password_hash: PasswordHash,
  pub name: DisplayName,
}

impl NewUser {
  pub fn new(email: Email, password_hash: PasswordHash, name: DisplayName) -> Self {
    Self {
      email,
      password_hash,
      name,
    }
  }
}

/// Server-side session record keyed by the hash of the cookie token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  /// Unique identifier for the session
  pub id: Uuid,
  /// Reference to the user who owns this session
  pub user_id: UserId,
  /// SHA-256 of the session token
  pub token_hash: String,
  /// Timestamp when the session expires
  pub expires_at: DateTime<Utc>,
  /// Timestamp when the session was created
  pub created_at: DateTime<Utc>,
}

impl Session {
  /// Creates a session that expires `duration` from now
  ///
  /// # Errors
  /// `AuthError::SessionLifetimeOutOfRange` when the expiry does not fit in a
  /// `DateTime<Utc>`.
  pub fn with_duration(
    user_id: UserId,
    token_hash: TokenHash,
    duration: Duration,
  ) -> Result<Self, AuthError> {
    let now = Utc::now();
    let expires_at = now
      .checked_add_signed(duration)
      .ok_or(AuthError::SessionLifetimeOutOfRange(duration.num_seconds()))?;

    Ok(Self {
      id: Uuid::new_v4(),
      user_id,
      token_hash: token_hash.into_inner(),
      expires_at,
      created_at: now,
    })
  }

  /// Creates a session from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    user_id: i64,
    token_hash: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      user_id: UserId::new(user_id),
      token_hash,
      expires_at,
      created_at,
    }
  }

  /// Checks if the session has expired
  pub fn is_expired(&self) -> bool {
    Utc::now() >= self.expires_at
  }
}

/// Who is making the current request
#[derive(Debug, Clone)]
pub enum AuthState {
  Anonymous,
  Authenticated(User),
}

impl AuthState {
  pub fn is_authenticated(&self) -> bool {
    matches!(self, AuthState::Authenticated(_))
  }

  pub fn user(&self) -> Option<&User> {
    match self {
      AuthState::Anonymous => None,
      AuthState::Authenticated(user) => Some(user),
    }
  }
}

impl From<Option<User>> for AuthState {
  fn from(user: Option<User>) -> Self {
    match user {
      Some(user) => AuthState::Authenticated(user),
      None => AuthState::Anonymous,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::value_objects::SessionToken;

  fn sample_user() -> User {
    User::from_db(
      7,
      "a@x.com".to_string(),
      "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA".to_string(),
      "A".to_string(),
      Utc::now(),
    )
  }

  #[test]
  fn test_session_expiry() {
    let token = SessionToken::generate();
    let live = Session::with_duration(UserId::new(1), token.hash(), Duration::hours(1)).unwrap();
    assert!(!live.is_expired());

    let stale =
      Session::with_duration(UserId::new(1), token.hash(), Duration::seconds(-1)).unwrap();
    assert!(stale.is_expired());
  }

  #[test]
  fn test_session_expiry_past_calendar_range() {
    let token = SessionToken::generate();
    let result = Session::with_duration(
      UserId::new(1),
      token.hash(),
      Duration::seconds(10_000_000_000_000),
    );

    assert!(matches!(
      result,
      Err(AuthError::SessionLifetimeOutOfRange(10_000_000_000_000))
    ));
  }

  #[test]
  fn test_auth_state_from_option() {
    let state = AuthState::from(Some(sample_user()));
    assert!(state.is_authenticated());
    assert_eq!(state.user().map(|u| u.name.as_str()), Some("A"));

    let state = AuthState::from(None);
    assert!(!state.is_authenticated());
    assert!(state.user().is_none());
  }
}
