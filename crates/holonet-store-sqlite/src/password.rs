//! Argon2 hashing for user passwords.
//!
//! Only the PHC string (`$argon2id$v=19$…`) is persisted. The salt is
//! generated per hash, so equal passwords never produce equal hashes.
//!
//! Argon2 is CPU-bound, so the async store calls [`hash_blocking`]
//! and [`verify_blocking`], which run on tokio's blocking pool.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result};

pub fn hash(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| Error::PasswordHash(e.to_string()))?
    .to_string();
  Ok(hash)
}

/// `false` for a wrong password and for an unparseable stored hash alike.
pub fn verify(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    tracing::warn!("stored password hash is not a valid PHC string");
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// [`hash`] on the blocking pool.
pub async fn hash_blocking(password: String) -> Result<String> {
  tokio::task::spawn_blocking(move || hash(&password))
    .await
    .map_err(|e| Error::Blocking(e.to_string()))?
}

/// [`verify`] on the blocking pool.
pub async fn verify_blocking(password: String, phc: String) -> Result<bool> {
  tokio::task::spawn_blocking(move || verify(&password, &phc))
    .await
    .map_err(|e| Error::Blocking(e.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let phc = hash("use the force").unwrap();
    assert!(phc.starts_with("$argon2"));
    assert!(verify("use the force", &phc));
    assert!(!verify("use the dark side", &phc));
  }

  #[test]
  fn salts_differ() {
    assert_ne!(hash("same").unwrap(), hash("same").unwrap());
  }

  #[test]
  fn garbage_hash_never_verifies() {
    assert!(!verify("anything", "not-a-phc-string"));
  }

  #[tokio::test]
  async fn blocking_pool_round_trip() {
    let phc = hash_blocking("rebel scum".into()).await.unwrap();
    assert!(verify_blocking("rebel scum".into(), phc.clone()).await.unwrap());
    assert!(!verify_blocking("imperial".into(), phc).await.unwrap());
  }
}
