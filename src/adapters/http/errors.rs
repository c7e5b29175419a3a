use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header},
};
use thiserror::Error;

use crate::domain::RepositoryError;
use crate::domain::auth::errors::AuthError;
use crate::domain::catalog::CatalogError;

/// Web error type that maps domain errors to HTTP responses
///
/// Handlers that own a form re-render it for the user-facing variants (see
/// [`WebError::form_message`]); everything else becomes a response through
/// `ResponseError`.
#[derive(Debug, Error)]
pub enum WebError {
  /// Malformed or missing form input (400)
  #[error("{0}")]
  Validation(String),

  /// Credentials did not check out (401)
  #[error("{0}")]
  Unauthorized(String),

  /// No usable session; answered with a redirect to the login page
  #[error("Authentication required")]
  Unauthenticated,

  /// Unique constraint on email or title (409)
  #[error("{0}")]
  Conflict(String),

  /// Missing resource (404)
  #[error("{0}")]
  NotFound(String),

  /// Anything else (500); the detail is logged, never shown
  #[error("Internal error: {0}")]
  Internal(String),
}

impl WebError {
  /// The message to show next to a re-rendered form, if this error belongs
  /// there
  pub fn form_message(&self) -> Option<String> {
    match self {
      WebError::Validation(msg) | WebError::Unauthorized(msg) | WebError::Conflict(msg) => {
        Some(msg.clone())
      }
      _ => None,
    }
  }
}

impl ResponseError for WebError {
  fn status_code(&self) -> StatusCode {
    match self {
      WebError::Validation(_) => StatusCode::BAD_REQUEST,
      WebError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      WebError::Unauthenticated => StatusCode::FOUND,
      WebError::Conflict(_) => StatusCode::CONFLICT,
      WebError::NotFound(_) => StatusCode::NOT_FOUND,
      WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let message = match self {
      WebError::Unauthenticated => {
        return HttpResponse::Found()
          .insert_header((header::LOCATION, "/login"))
          .finish();
      }
      WebError::Internal(detail) => {
        tracing::error!("Internal error: {}", detail);
        "Something went wrong on our side. Please try again later.".to_string()
      }
      other => other.to_string(),
    };

    HttpResponse::build(self.status_code())
      .content_type(header::ContentType::html())
      .body(format!(
        "<!DOCTYPE html><html><body><p>{}</p><p><a href=\"/\">Home</a></p></body></html>",
        tera::escape_html(&message)
      ))
  }
}

impl From<AuthError> for WebError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::EmailAlreadyRegistered => WebError::Conflict(error.to_string()),
      AuthError::EmailNotFound | AuthError::IncorrectPassword => {
        WebError::Unauthorized(error.to_string())
      }
      AuthError::InvalidSession => WebError::Unauthenticated,
      AuthError::ValueObject(err) => WebError::Validation(err.to_string()),
      AuthError::Repository(RepositoryError::DuplicateKey(_)) => {
        WebError::Conflict(AuthError::EmailAlreadyRegistered.to_string())
      }
      AuthError::Repository(err) => WebError::Internal(err.to_string()),
      AuthError::Hash(err) => WebError::Internal(err.to_string()),
      AuthError::SessionLifetimeOutOfRange(_) => WebError::Internal(error.to_string()),
    }
  }
}

impl From<CatalogError> for WebError {
  fn from(error: CatalogError) -> Self {
    match error {
      CatalogError::TitleAlreadyExists(_) => WebError::Conflict(error.to_string()),
      CatalogError::Validation(err) => WebError::Validation(err.to_string()),
      CatalogError::Repository(err) => WebError::Internal(err.to_string()),
    }
  }
}

impl From<tera::Error> for WebError {
  fn from(error: tera::Error) -> Self {
    WebError::Internal(format!("Template error: {:?}", error))
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for WebError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    // field_errors() is a map; keep the output stable
    messages.sort();

    WebError::Validation(messages.join(", "))
  }
}
