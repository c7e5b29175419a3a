use std::sync::Arc;

use crate::domain::auth::entities::AuthState;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Use case for resolving the caller behind a session token
pub struct GetCurrentUserUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentUserUseCase {
  /// Creates a new instance of GetCurrentUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Resolves the token to `Authenticated(user)` or `Anonymous`
  ///
  /// # Errors
  /// Only storage failures are errors; invalid sessions are `Anonymous`
  pub async fn execute(&self, session_token: &SessionToken) -> Result<AuthState, AuthError> {
    self.auth_service.resolve_session(session_token).await
  }
}
