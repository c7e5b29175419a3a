use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::domain::auth::value_objects::SessionToken;

type HmacSha256 = Hmac<Sha256>;

/// Signs session tokens before they go into a cookie
///
/// The cookie value is `<token>.<hex hmac-sha256(secret, token)>`. A value
/// whose signature does not match never reaches the session store.
#[derive(Clone)]
pub struct SessionSigner {
  key: Vec<u8>,
}

impl SessionSigner {
  pub fn new(secret: &[u8]) -> Self {
    Self {
      key: secret.to_vec(),
    }
  }

  /// Uses the configured secret, or a random per-process key when none is
  /// set. With a random key every restart logs all users out.
  pub fn from_config(secret: Option<&str>) -> Self {
    match secret {
      Some(secret) if !secret.is_empty() => Self::new(secret.as_bytes()),
      _ => {
        tracing::warn!(
          "SESSION_SECRET is not set; using a random key, sessions will not survive a restart"
        );
        let mut key = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut key);
        Self::new(&key)
      }
    }
  }

  fn mac(&self) -> HmacSha256 {
    // HMAC accepts keys of any length
    match HmacSha256::new_from_slice(&self.key) {
      Ok(mac) => mac,
      Err(_) => unreachable!("hmac accepts keys of any length"),
    }
  }

  pub fn sign(&self, token: &SessionToken) -> String {
    let mut mac = self.mac();
    mac.update(token.as_str().as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("{}.{}", token.as_str(), signature)
  }

  /// Returns the token if the value is well formed and correctly signed
  pub fn verify(&self, value: &str) -> Option<SessionToken> {
    let (token, signature) = value.split_once('.')?;
    let signature = hex::decode(signature).ok()?;

    let mut mac = self.mac();
    mac.update(token.as_bytes());
    mac.verify_slice(&signature).ok()?;

    SessionToken::from_string(token).ok()
  }
}

impl std::fmt::Debug for SessionSigner {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("SessionSigner(***)")
  }
}
