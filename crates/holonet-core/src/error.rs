//! Error types for `holonet-core`.

use thiserror::Error;

use crate::{favorite::FavoriteTarget, record::Entity};

#[derive(Debug, Error)]
pub enum Error {
  #[error("{entity} not found: {id}")]
  NotFound { entity: Entity, id: i64 },

  #[error("user {user_id} has not favorited {target}")]
  NotFavorited { user_id: i64, target: FavoriteTarget },

  /// A uniqueness or foreign-key rule was broken.
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("invalid {field}: {reason}")]
  Validation { field: &'static str, reason: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub fn not_found(entity: Entity, id: i64) -> Self {
    Self::NotFound { entity, id }
  }

  pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
    Self::Validation { field, reason: reason.into() }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound { .. } | Self::NotFavorited { .. } => ErrorKind::NotFound,
      Self::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
      Self::Validation { .. } => ErrorKind::Validation,
      Self::Serialization(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Taxonomy ────────────────────────────────────────────────────────────────

/// The coarse error categories surfaced to the HTTP layer, which maps them
/// onto response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  NotFound,
  ConstraintViolation,
  Validation,
  /// Anything the caller cannot fix by changing the request.
  Internal,
}

impl ErrorKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::NotFound => "NOT_FOUND",
      Self::ConstraintViolation => "CONSTRAINT_VIOLATION",
      Self::Validation => "VALIDATION_ERROR",
      Self::Internal => "INTERNAL",
    }
  }
}

/// Implemented by backend error types so callers generic over
/// [`crate::store::CatalogStore`] can still branch on the taxonomy.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind { Error::kind(self) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::favorite::FavoriteKind;

  #[test]
  fn kinds_cover_taxonomy() {
    assert_eq!(
      Error::not_found(Entity::Planet, 3).kind(),
      ErrorKind::NotFound
    );
    assert_eq!(
      Error::NotFavorited {
        user_id: 1,
        target:  FavoriteTarget::Planet(2),
      }
      .kind(),
      ErrorKind::NotFound
    );
    assert_eq!(
      Error::ConstraintViolation("dup".into()).kind(),
      ErrorKind::ConstraintViolation
    );
    assert_eq!(Error::invalid("email", "missing").kind(), ErrorKind::Validation);
  }

  #[test]
  fn messages_name_the_entity() {
    let err = Error::not_found(Entity::Favorite(FavoriteKind::Starship), 9);
    assert_eq!(err.to_string(), "favorite starship not found: 9");

    let err = Error::NotFavorited {
      user_id: 4,
      target:  FavoriteTarget::Character(7),
    };
    assert_eq!(err.to_string(), "user 4 has not favorited character 7");
  }
}
