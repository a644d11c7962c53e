//! Error type for `holonet-store-sqlite`.

use holonet_core::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] holonet_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("password hash error: {0}")]
  PasswordHash(String),

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("blocking task failed: {0}")]
  Blocking(String),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      _ => ErrorKind::Internal,
    }
  }
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind { Error::kind(self) }
}

/// Sort a connection-thread error into the catalog taxonomy.
///
/// SQLite constraint failures become [`holonet_core::Error::ConstraintViolation`],
/// and core errors raised inside a `call` closure (see [`reject`]) are
/// unwrapped back to themselves.
impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
        failure,
        message,
      )) if failure.code == rusqlite::ErrorCode::ConstraintViolation => {
        let detail = message.unwrap_or_else(|| failure.to_string());
        tracing::debug!(%detail, "constraint violation");
        Self::Core(holonet_core::Error::ConstraintViolation(detail))
      }
      tokio_rusqlite::Error::Other(inner) => {
        match inner.downcast::<holonet_core::Error>() {
          Ok(core) => Self::Core(*core),
          Err(other) => Self::Database(tokio_rusqlite::Error::Other(other)),
        }
      }
      other => Self::Database(other),
    }
  }
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self { tokio_rusqlite::Error::Rusqlite(e).into() }
}

/// Abort a `call` closure with a catalog error.
pub(crate) fn reject(e: holonet_core::Error) -> tokio_rusqlite::Error {
  if let holonet_core::Error::ConstraintViolation(detail) = &e {
    tracing::debug!(%detail, "constraint violation");
  }
  tokio_rusqlite::Error::Other(Box::new(e))
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use holonet_core::Entity;

  #[test]
  fn rejected_core_errors_survive_the_round_trip() {
    let err: Error = reject(holonet_core::Error::not_found(Entity::User, 7)).into();
    assert!(matches!(
      err,
      Error::Core(holonet_core::Error::NotFound { entity: Entity::User, id: 7 })
    ));
    assert_eq!(err.kind(), ErrorKind::NotFound);
  }

  #[test]
  fn sqlite_constraint_failures_are_classified() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn
      .execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
      .unwrap();
    let raw = conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err();

    let err = Error::from(raw);
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert!(err.to_string().contains("UNIQUE"));
  }

  #[test]
  fn other_database_errors_are_internal() {
    let err = Error::from(tokio_rusqlite::Error::ConnectionClosed);
    assert!(matches!(err, Error::Database(_)));
    assert_eq!(err.kind(), ErrorKind::Internal);
  }
}
