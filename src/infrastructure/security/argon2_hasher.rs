use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};
use crate::infrastructure::config::SecurityConfig;

/// Argon2id password hasher
///
/// Every hash gets a fresh random salt; the cost parameters come from
/// configuration and are recorded in the PHC string, so changing them does
/// not invalidate existing hashes. Hashing and verification run on the
/// blocking thread pool.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  /// Creates a hasher with explicit cost parameters
  ///
  /// * `memory_kib` - memory cost in KiB (at least 8 * parallelism)
  /// * `iterations` - time cost
  /// * `parallelism` - lanes
  pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
    let params = Params::new(memory_kib, iterations, parallelism, Some(32))
      .map_err(|e| AuthError::Hash(HashError::InvalidParams(e.to_string())))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    Ok(Self { argon2 })
  }

  pub fn from_config(config: &SecurityConfig) -> Result<Self, AuthError> {
    Self::new(
      config.argon2_memory_kib,
      config.argon2_iterations,
      config.argon2_parallelism,
    )
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();

    let hash = tokio::task::spawn_blocking(move || {
      let salt = SaltString::generate(&mut rand::rngs::OsRng);
      argon2
        .hash_password(password.as_str().as_bytes(), &salt)
        .map(|hash| hash.to_string())
    })
    .await
    .map_err(|e| AuthError::Hash(HashError::HashingFailed(e.to_string())))?
    .map_err(|e| AuthError::Hash(HashError::HashingFailed(e.to_string())))?;

    PasswordHash::from_hash(hash).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Invalid hash format: {}",
        e
      )))
    })
  }

  /// Verification uses the constant-time comparison inside
  /// `verify_password`
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();
    let hashed_password = hashed_password.clone();

    tokio::task::spawn_blocking(move || {
      let parsed_hash = Argon2PasswordHash::new(hashed_password.as_str()).map_err(|e| {
        AuthError::Hash(HashError::VerificationFailed(format!(
          "Invalid hash format: {}",
          e
        )))
      })?;

      match argon2.verify_password(password.as_str().as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Hash(HashError::VerificationFailed(format!(
          "Password verification failed: {}",
          e
        )))),
      }
    })
    .await
    .map_err(|e| AuthError::Hash(HashError::VerificationFailed(e.to_string())))?
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn hasher() -> Argon2PasswordHasher {
    Argon2PasswordHasher::new(1024, 1, 1).unwrap()
  }

  #[tokio::test]
  async fn test_hash_password() {
    let password = Password::new("p1").unwrap();

    let hash = hasher().hash(&password).await.unwrap();

    assert!(hash.as_str().starts_with("$argon2id$"));
    assert!(!hash.as_str().contains("p1$"));
  }

  #[tokio::test]
  async fn test_verify_correct_and_incorrect_password() {
    let hasher = hasher();
    let password = Password::new("test_password_123").unwrap();
    let wrong_password = Password::new("wrong_password").unwrap();

    let hash = hasher.hash(&password).await.unwrap();

    assert!(hasher.verify(&password, &hash).await.unwrap());
    assert!(!hasher.verify(&wrong_password, &hash).await.unwrap());
  }

  #[tokio::test]
  async fn test_hash_produces_different_salts() {
    let hasher = hasher();
    let password = Password::new("test_password_123").unwrap();

    let hash1 = hasher.hash(&password).await.unwrap();
    let hash2 = hasher.hash(&password).await.unwrap();

    assert_ne!(hash1.as_str(), hash2.as_str());
    assert!(hasher.verify(&password, &hash1).await.unwrap());
    assert!(hasher.verify(&password, &hash2).await.unwrap());
  }

  #[tokio::test]
  async fn test_parameters_are_recorded_in_hash() {
    let hasher = Argon2PasswordHasher::new(2048, 3, 1).unwrap();
    let password = Password::new("p1").unwrap();

    let hash = hasher.hash(&password).await.unwrap();
    let parsed = Argon2PasswordHash::new(hash.as_str()).unwrap();

    assert_eq!(parsed.version, Some(Version::V0x13 as u32));
    assert!(hash.as_str().contains("m=2048,t=3,p=1"));
  }

  #[tokio::test]
  async fn test_hash_verifies_across_parameter_changes() {
    let password = Password::new("p1").unwrap();
    let old_hash = hasher().hash(&password).await.unwrap();

    let stronger = Argon2PasswordHasher::new(2048, 2, 1).unwrap();
    assert!(stronger.verify(&password, &old_hash).await.unwrap());
  }

  #[test]
  fn test_invalid_parameters() {
    assert!(matches!(
      Argon2PasswordHasher::new(1, 1, 1),
      Err(AuthError::Hash(HashError::InvalidParams(_)))
    ));
  }
}
