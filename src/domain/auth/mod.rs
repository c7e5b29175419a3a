pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{AuthState, NewUser, Session, User};
pub use errors::{AuthError, HashError, RepositoryError};
pub use services::{AuthService, AuthServiceConfig};
pub use value_objects::{
  DisplayName, Email, Password, PasswordHash, SessionToken, TokenHash, UserId, ValueObjectError,
};
