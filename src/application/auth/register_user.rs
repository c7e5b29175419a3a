use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{DisplayName, Email, Password, SessionToken, UserId};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text, will be hashed)
  pub password: String,
  /// Name shown on the protected page
  pub name: String,
}

/// Response after successful user registration
#[derive(Debug, Clone)]
pub struct RegisterUserResponse {
  pub user_id: UserId,
  pub name: String,
  /// Session token for immediate login
  pub session_token: SessionToken,
  /// Session expiration timestamp
  pub expires_at: DateTime<Utc>,
}

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user registration use case
  ///
  /// # Errors
  /// Returns `AuthError` if registration fails (e.g., email already
  /// registered, validation errors)
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
  ) -> Result<RegisterUserResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;
    let name = DisplayName::new(command.name)?;

    let (user, session, session_token) = self.auth_service.register(email, password, name).await?;

    Ok(RegisterUserResponse {
      user_id: user.id,
      name: user.name,
      session_token,
      expires_at: session.expires_at,
    })
  }
}
