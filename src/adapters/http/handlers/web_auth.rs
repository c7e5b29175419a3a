use actix_web::{HttpResponse, ResponseError, http::header, web};
use std::sync::Arc;
use validator::Validate;

use super::render_html;
use crate::adapters::http::{
  dtos::{LoginForm, RegisterForm},
  errors::WebError,
  middleware::CurrentUser,
  session::SessionCookies,
  templates::TemplateEngine,
};
use crate::application::auth::{LoginUserUseCase, LogoutUserUseCase, RegisterUserUseCase};
use crate::domain::RepositoryError;
use crate::domain::auth::errors::AuthError;

/// Handle registration form submission
pub async fn register_submit(
  form: web::Form<RegisterForm>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
  cookies: web::Data<SessionCookies>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, WebError> {
  let form = form.into_inner();

  if let Err(errors) = form.validate() {
    return rerender_register(&templates, &form, WebError::from(errors));
  }

  match use_case.execute(form.clone().into()).await {
    Ok(response) => {
      tracing::info!("Registered user_id={}", response.user_id);
      Ok(
        HttpResponse::Found()
          .cookie(cookies.issue(&response.session_token))
          .insert_header((header::LOCATION, "/secrets"))
          .finish(),
      )
    }
    Err(e) => rerender_register(&templates, &form, WebError::from(e)),
  }
}

/// Handle login form submission
pub async fn login_submit(
  form: web::Form<LoginForm>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
  cookies: web::Data<SessionCookies>,
  templates: web::Data<TemplateEngine>,
) -> Result<HttpResponse, WebError> {
  let form = form.into_inner();

  if let Err(errors) = form.validate() {
    return rerender_login(&templates, &form, WebError::from(errors));
  }

  match use_case.execute(form.clone().into()).await {
    Ok(response) => {
      tracing::info!("Login successful for user_id={}", response.user_id);
      Ok(
        HttpResponse::Found()
          .cookie(cookies.issue(&response.session_token))
          .insert_header((header::LOCATION, "/secrets"))
          .finish(),
      )
    }
    Err(e) => rerender_login(&templates, &form, WebError::from(e)),
  }
}

/// Handle logout
///
/// The session row is deleted and the cookie expired; a session that is
/// already gone still ends on the login page.
pub async fn logout(
  current: CurrentUser,
  use_case: web::Data<Arc<LogoutUserUseCase>>,
  cookies: web::Data<SessionCookies>,
) -> Result<HttpResponse, WebError> {
  match use_case.execute(&current.token).await {
    Ok(()) => tracing::info!("Logged out user_id={}", current.user.id),
    Err(AuthError::InvalidSession) | Err(AuthError::Repository(RepositoryError::NotFound)) => {
      tracing::debug!("Session already gone for user_id={}", current.user.id);
    }
    Err(e) => return Err(e.into()),
  }

  Ok(
    HttpResponse::Found()
      .cookie(cookies.removal())
      .insert_header((header::LOCATION, "/login"))
      .finish(),
  )
}

fn rerender_register(
  templates: &TemplateEngine,
  form: &RegisterForm,
  error: WebError,
) -> Result<HttpResponse, WebError> {
  let Some(message) = error.form_message() else {
    return Err(error);
  };
  tracing::warn!("Registration rejected: {}", message);

  let mut context = tera::Context::new();
  context.insert("error", &message);
  context.insert("email", &form.email);
  context.insert("name", &form.name);

  render_html(templates, "auth/register.html.tera", &context, error.status_code())
}

fn rerender_login(
  templates: &TemplateEngine,
  form: &LoginForm,
  error: WebError,
) -> Result<HttpResponse, WebError> {
  let Some(message) = error.form_message() else {
    return Err(error);
  };
  tracing::warn!("Login rejected: {}", message);

  let mut context = tera::Context::new();
  context.insert("error", &message);
  context.insert("email", &form.email);

  render_html(templates, "auth/login.html.tera", &context, error.status_code())
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::http::StatusCode;

  #[test]
  fn test_rerender_keeps_status_and_values() {
    let templates = crate::adapters::http::templates::test_engine();
    let form = LoginForm {
      email: "a@x.com".to_string(),
      password: "secret-value".to_string(),
    };

    let response =
      rerender_login(&templates, &form, WebError::from(AuthError::IncorrectPassword)).unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  }

  #[test]
  fn test_rerender_passes_through_internal_errors() {
    let templates = crate::adapters::http::templates::test_engine();

    let result = rerender_register(
      &templates,
      &RegisterForm::default(),
      WebError::Internal("db down".to_string()),
    );

    assert!(matches!(result, Err(WebError::Internal(_))));
  }
}
