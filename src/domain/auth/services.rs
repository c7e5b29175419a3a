use chrono::Duration;
use std::sync::Arc;

use super::entities::{AuthState, NewUser, Session, User};
use super::errors::{AuthError, RepositoryError};
use super::ports::{PasswordHasher, SessionRepository, UserRepository};
use super::value_objects::{DisplayName, Email, Password, PasswordHash, SessionToken};

/// Configuration for the authentication service
#[derive(Debug, Clone, Copy)]
pub struct AuthServiceConfig {
  pub session_ttl_seconds: i64,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      session_ttl_seconds: 24 * 60 * 60,
    }
  }
}

/// Authentication service implementing the account state machine:
/// `Anonymous` becomes `Authenticated` through register or login, and goes
/// back through logout or session expiry.
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  session_repo: Arc<dyn SessionRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  config: AuthServiceConfig,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      user_repo,
      session_repo,
      password_hasher,
      config,
    }
  }

  /// Registers a new user and opens a session for them
  ///
  /// # Errors
  /// Returns `AuthError::EmailAlreadyRegistered` if the email is taken, also
  /// when a concurrent registration wins the race on the unique constraint.
  pub async fn register(
    &self,
    email: Email,
    password: Password,
    name: DisplayName,
  ) -> Result<(User, Session, SessionToken), AuthError> {
    if self.user_repo.find_by_email(&email).await?.is_some() {
      return Err(AuthError::EmailAlreadyRegistered);
    }

    let password_hash = self.password_hasher.hash(&password).await?;

    let created_user = match self
      .user_repo
      .create(NewUser::new(email, password_hash, name))
      .await
    {
      Ok(user) => user,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_))) => {
        return Err(AuthError::EmailAlreadyRegistered);
      }
      Err(e) => return Err(e),
    };

    let (session, token) = self.open_session(&created_user).await?;

    Ok((created_user, session, token))
  }

  /// Authenticates a user by email and password and opens a session
  ///
  /// # Errors
  /// `AuthError::EmailNotFound` when no account uses the email,
  /// `AuthError::IncorrectPassword` when the password does not match.
  pub async fn login(
    &self,
    email: Email,
    password: Password,
  ) -> Result<(User, Session, SessionToken), AuthError> {
    let user = self
      .user_repo
      .find_by_email(&email)
      .await?
      .ok_or(AuthError::EmailNotFound)?;

    // A stored value that is not a PHC hash can never match
    let stored_hash = match PasswordHash::from_hash(&user.password_hash) {
      Ok(hash) => hash,
      Err(_) => {
        tracing::warn!(user_id = %user.id, "Stored password is not a valid hash");
        return Err(AuthError::IncorrectPassword);
      }
    };

    if !self.password_hasher.verify(&password, &stored_hash).await? {
      return Err(AuthError::IncorrectPassword);
    }

    let (session, token) = self.open_session(&user).await?;

    Ok((user, session, token))
  }

  /// Invalidates the session behind `token`
  ///
  /// # Errors
  /// Returns `AuthError::InvalidSession` if no such session exists
  pub async fn logout(&self, token: &SessionToken) -> Result<(), AuthError> {
    let session = self
      .session_repo
      .find_by_token_hash(&token.hash())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    self.session_repo.delete(session.id).await
  }

  /// Resolves a session token to the state of the caller
  ///
  /// Unknown tokens, expired sessions and sessions whose user no longer
  /// exists all resolve to `AuthState::Anonymous`. Only storage failures are
  /// errors.
  pub async fn resolve_session(&self, token: &SessionToken) -> Result<AuthState, AuthError> {
    let Some(session) = self.session_repo.find_by_token_hash(&token.hash()).await? else {
      return Ok(AuthState::Anonymous);
    };

    if session.is_expired() {
      tracing::debug!(session_id = %session.id, "Session expired");
      self.session_repo.delete(session.id).await?;
      return Ok(AuthState::Anonymous);
    }

    match self.user_repo.find_by_id(session.user_id).await? {
      Some(user) => Ok(AuthState::Authenticated(user)),
      None => {
        tracing::warn!(session_id = %session.id, "Session refers to a missing user");
        self.session_repo.delete(session.id).await?;
        Ok(AuthState::Anonymous)
      }
    }
  }

  /// Deletes every expired session
  pub async fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
    self.session_repo.delete_expired().await
  }

  pub fn session_ttl(&self) -> Result<Duration, AuthError> {
    let seconds = self.config.session_ttl_seconds;
    Duration::try_seconds(seconds).ok_or(AuthError::SessionLifetimeOutOfRange(seconds))
  }

  async fn open_session(&self, user: &User) -> Result<(Session, SessionToken), AuthError> {
    let token = SessionToken::generate();
    let session = Session::with_duration(user.id, token.hash(), self.session_ttl()?)?;
    let created = self.session_repo.create(session).await?;

    Ok((created, token))
  }
}
