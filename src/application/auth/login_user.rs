use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password, SessionToken, UserId};

/// Command for logging in a user
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text)
  pub password: String,
}

/// Response after successful user login
#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  pub user_id: UserId,
  pub name: String,
  /// Session token for authentication
  pub session_token: SessionToken,
  /// Session expiration timestamp
  pub expires_at: DateTime<Utc>,
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user login use case
  ///
  /// # Errors
  /// Returns `AuthError::EmailNotFound` or `AuthError::IncorrectPassword`
  /// for bad credentials, `AuthError::ValueObject` for malformed input
  pub async fn execute(&self, command: LoginUserCommand) -> Result<LoginUserResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;

    let (user, session, session_token) = self.auth_service.login(email, password).await?;

    Ok(LoginUserResponse {
      user_id: user.id,
      name: user.name,
      session_token,
      expires_at: session.expires_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::auth::{RegisterUserCommand, RegisterUserUseCase};
  use crate::test_support;

  fn login(email: &str, password: &str) -> LoginUserCommand {
    LoginUserCommand {
      email: email.to_string(),
      password: password.to_string(),
    }
  }

  #[tokio::test]
  async fn test_login_after_register() {
    let (auth_service, _, _) = test_support::auth_service();
    RegisterUserUseCase::new(auth_service.clone())
      .execute(RegisterUserCommand {
        email: "a@x.com".to_string(),
        password: "p1".to_string(),
        name: "A".to_string(),
      })
      .await
      .unwrap();
    let use_case = LoginUserUseCase::new(auth_service);

    let response = use_case.execute(login("A@x.com", "p1")).await.unwrap();
    assert_eq!(response.name, "A");

    assert!(matches!(
      use_case.execute(login("a@x.com", "wrong")).await,
      Err(AuthError::IncorrectPassword)
    ));
    assert!(matches!(
      use_case.execute(login("b@x.com", "p1")).await,
      Err(AuthError::EmailNotFound)
    ));
  }
}
