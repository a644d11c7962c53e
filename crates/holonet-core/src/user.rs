//! Users: the owners of favorites.
//!
//! The password only ever travels inward. [`NewUser`] and [`UserPatch`] carry
//! it in plain text to the store, which hashes it; [`User`] has no field for
//! it at all, so no read path can leak it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  record::{Entity, PublicRecord},
  validate,
};

pub const NAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 120;

/// A stored user, as seen by API consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:        i64,
  pub name:      String,
  pub email:     String,
  pub is_active: bool,
}

impl PublicRecord for User {
  fn entity(&self) -> Entity { Entity::User }

  fn id(&self) -> i64 { self.id }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::CatalogStore::create_user`].
#[derive(Clone, Deserialize)]
pub struct NewUser {
  pub name:      String,
  pub email:     String,
  pub password:  String,
  #[serde(default = "default_active")]
  pub is_active: bool,
}

fn default_active() -> bool { true }

impl NewUser {
  pub fn new(
    name: impl Into<String>,
    email: impl Into<String>,
    password: impl Into<String>,
  ) -> Self {
    Self {
      name:      name.into(),
      email:     email.into(),
      password:  password.into(),
      is_active: true,
    }
  }

  /// Check every field and return the normalised input.
  pub fn validate(self) -> Result<Self> {
    validate::password(&self.password)?;
    Ok(Self {
      name:      validate::required("name", &self.name, NAME_MAX)?,
      email:     validate::email(&self.email, EMAIL_MAX)?,
      password:  self.password,
      is_active: self.is_active,
    })
  }
}

/// Partial update; `None` leaves the field untouched.
#[derive(Clone, Default, Deserialize)]
pub struct UserPatch {
  pub name:      Option<String>,
  pub email:     Option<String>,
  pub password:  Option<String>,
  pub is_active: Option<bool>,
}

impl UserPatch {
  pub fn validate(self) -> Result<Self> {
    if let Some(password) = &self.password {
      validate::password(password)?;
    }
    Ok(Self {
      name:      self
        .name
        .map(|n| validate::required("name", &n, NAME_MAX))
        .transpose()?,
      email:     self
        .email
        .map(|e| validate::email(&e, EMAIL_MAX))
        .transpose()?,
      password:  self.password,
      is_active: self.is_active,
    })
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.email.is_none()
      && self.password.is_none()
      && self.is_active.is_none()
  }
}

// Hand-written so a logged input never shows the password.
impl fmt::Debug for NewUser {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NewUser")
      .field("name", &self.name)
      .field("email", &self.email)
      .field("password", &"<redacted>")
      .field("is_active", &self.is_active)
      .finish()
  }
}

impl fmt::Debug for UserPatch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("UserPatch")
      .field("name", &self.name)
      .field("email", &self.email)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .field("is_active", &self.is_active)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  #[test]
  fn serialized_user_has_only_public_fields() {
    let user = User {
      id:        1,
      name:      "Leia".into(),
      email:     "leia@rebels.org".into(),
      is_active: true,
    };
    let map = user.to_public_map().unwrap();
    let mut keys: Vec<_> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["email", "id", "is_active", "name"]);
    assert_eq!(map["email"], "leia@rebels.org");
  }

  #[test]
  fn debug_redacts_password() {
    let input = NewUser::new("Han", "han@falcon.net", "hunter2");
    let shown = format!("{input:?}");
    assert!(!shown.contains("hunter2"));

    let patch = UserPatch {
      password: Some("hunter3".into()),
      ..Default::default()
    };
    assert!(!format!("{patch:?}").contains("hunter3"));
  }

  #[test]
  fn missing_email_is_a_validation_error() {
    let err = NewUser::new("Leia", "", "pw").validate().unwrap_err();
    assert!(matches!(err, Error::Validation { field: "email", .. }));
  }

  #[test]
  fn new_user_is_normalised() {
    let input = NewUser::new(" Leia ", " leia@rebels.org", "pw")
      .validate()
      .unwrap();
    assert_eq!(input.name, "Leia");
    assert_eq!(input.email, "leia@rebels.org");
  }

  #[test]
  fn deserialised_user_defaults_to_active() {
    let input: NewUser = serde_json::from_value(serde_json::json!({
      "name": "Luke",
      "email": "luke@rebels.org",
      "password": "x"
    }))
    .unwrap();
    assert!(input.is_active);
  }

  #[test]
  fn patch_rejects_empty_password() {
    let patch = UserPatch {
      password: Some(String::new()),
      ..Default::default()
    };
    assert!(patch.validate().is_err());
    assert!(UserPatch::default().is_empty());
  }
}
