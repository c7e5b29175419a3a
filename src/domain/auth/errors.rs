use thiserror::Error;

use super::value_objects::ValueObjectError;

pub use crate::domain::errors::RepositoryError;

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("You've already signed up with that email, log in instead!")]
  EmailAlreadyRegistered,

  #[error("That email does not exist, please try again.")]
  EmailNotFound,

  #[error("Password incorrect, please try again.")]
  IncorrectPassword,

  #[error("Invalid or expired session")]
  InvalidSession,

  #[error("Session lifetime of {0} seconds is out of range")]
  SessionLifetimeOutOfRange(i64),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("{0}")]
  ValueObject(#[from] ValueObjectError),
}

impl AuthError {
  /// Whether the caller supplied bad credentials (as opposed to bad input or
  /// an infrastructure failure)
  pub fn is_credential_failure(&self) -> bool {
    matches!(self, AuthError::EmailNotFound | AuthError::IncorrectPassword)
  }
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hasher parameters: {0}")]
  InvalidParams(String),
}

// Automatic conversions from external error types

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}
