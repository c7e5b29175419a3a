use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Use case for logging out a user
pub struct LogoutUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LogoutUserUseCase {
  /// Creates a new instance of LogoutUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Deletes the session behind the token
  ///
  /// # Errors
  /// Returns `AuthError::InvalidSession` if the session is already gone
  pub async fn execute(&self, session_token: &SessionToken) -> Result<(), AuthError> {
    self.auth_service.logout(session_token).await
  }
}
