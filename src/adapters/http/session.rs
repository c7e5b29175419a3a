use actix_web::cookie::{Cookie, SameSite, time::Duration};

use crate::domain::auth::value_objects::SessionToken;
use crate::infrastructure::security::SessionSigner;

/// Name of the cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "session";

/// Issues, reads and clears the session cookie
#[derive(Clone, Debug)]
pub struct SessionCookies {
  signer: SessionSigner,
  max_age_seconds: i64,
  secure: bool,
}

impl SessionCookies {
  pub fn new(signer: SessionSigner, max_age_seconds: i64, secure: bool) -> Self {
    Self {
      signer,
      max_age_seconds,
      secure,
    }
  }

  pub fn issue(&self, token: &SessionToken) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, self.signer.sign(token))
      .path("/")
      .http_only(true)
      .secure(self.secure)
      .same_site(SameSite::Lax)
      .max_age(Duration::seconds(self.max_age_seconds))
      .finish()
  }

  /// An expired, empty cookie that makes the browser drop the session
  pub fn removal(&self) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
      .path("/")
      .http_only(true)
      .secure(self.secure)
      .same_site(SameSite::Lax)
      .max_age(Duration::ZERO)
      .finish()
  }

  /// The token inside a cookie value, if its signature holds
  pub fn token_from(&self, value: &str) -> Option<SessionToken> {
    self.signer.verify(value)
  }
}
