use actix_web::{
  Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
  body::EitherBody,
  dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header,
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::adapters::http::errors::WebError;
use crate::adapters::http::session::{SESSION_COOKIE, SessionCookies};
use crate::application::auth::GetCurrentUserUseCase;
use crate::domain::auth::entities::{AuthState, User};
use crate::domain::auth::value_objects::SessionToken;

/// The authenticated caller, placed in request extensions by
/// [`WebAuthMiddleware`]
#[derive(Debug, Clone)]
pub struct CurrentUser {
  pub user: User,
  pub token: SessionToken,
}

impl FromRequest for CurrentUser {
  type Error = WebError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(
      req
        .extensions()
        .get::<CurrentUser>()
        .cloned()
        .ok_or(WebError::Unauthenticated),
    )
  }
}

/// Gate for pages that need a logged-in user
///
/// Resolves the signed session cookie; an `Authenticated` caller proceeds
/// with a [`CurrentUser`] attached, anyone else is redirected to `/login`.
/// A cookie that no longer resolves is cleared on the way out.
pub struct WebAuthMiddleware {
  get_current_user: Arc<GetCurrentUserUseCase>,
  cookies: SessionCookies,
}

impl WebAuthMiddleware {
  pub fn new(get_current_user: Arc<GetCurrentUserUseCase>, cookies: SessionCookies) -> Self {
    Self {
      get_current_user,
      cookies,
    }
  }
}

impl<S, B> Transform<S, ServiceRequest> for WebAuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type InitError = ();
  type Transform = WebAuthMiddlewareService<S>;
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(WebAuthMiddlewareService {
      service: Rc::new(service),
      get_current_user: self.get_current_user.clone(),
      cookies: self.cookies.clone(),
    }))
  }
}

pub struct WebAuthMiddlewareService<S> {
  service: Rc<S>,
  get_current_user: Arc<GetCurrentUserUseCase>,
  cookies: SessionCookies,
}

impl<S, B> Service<ServiceRequest> for WebAuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let cookie_value = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
    let token = cookie_value
      .as_deref()
      .and_then(|value| self.cookies.token_from(value));

    let get_current_user = self.get_current_user.clone();
    let cookies = self.cookies.clone();
    let service = Rc::clone(&self.service);

    Box::pin(async move {
      if let Some(token) = token {
        match get_current_user.execute(&token).await {
          Ok(AuthState::Authenticated(user)) => {
            req.extensions_mut().insert(CurrentUser { user, token });
            let res = service.call(req).await?;
            return Ok(res.map_into_left_body());
          }
          Ok(AuthState::Anonymous) => {
            tracing::debug!("Session cookie did not resolve to a user");
          }
          Err(e) => {
            tracing::error!("Session resolution failed, treating caller as anonymous: {}", e);
          }
        }
      } else if cookie_value.is_some() {
        tracing::warn!("Rejected session cookie with a bad signature");
      }

      let mut redirect = HttpResponse::Found();
      redirect.insert_header((header::LOCATION, "/login"));
      if cookie_value.is_some() {
        redirect.cookie(cookies.removal());
      }

      let res = req.into_response(redirect.finish());
      Ok(res.map_into_right_body())
    })
  }
}
