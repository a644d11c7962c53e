//! The public, serialisable view shared by every catalog record.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Result, favorite::FavoriteKind};

/// Which table a record (or a missing record) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
  User,
  Planet,
  Starship,
  Character,
  Favorite(FavoriteKind),
}

impl fmt::Display for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::User => f.write_str("user"),
      Self::Planet => f.write_str("planet"),
      Self::Starship => f.write_str("starship"),
      Self::Character => f.write_str("character"),
      Self::Favorite(kind) => write!(f, "favorite {}", kind.as_str()),
    }
  }
}

/// A catalog row that can be handed to API consumers.
///
/// The serde representation of each implementor carries public fields only;
/// secrets are never part of a record type in the first place.
pub trait PublicRecord: Serialize {
  fn entity(&self) -> Entity;

  fn id(&self) -> i64;

  /// The plain field mapping returned to API consumers.
  fn to_public_map(&self) -> Result<Map<String, Value>> {
    match serde_json::to_value(self)? {
      Value::Object(map) => Ok(map),
      other => Err(Error::Serialization(serde::ser::Error::custom(format!(
        "{} did not serialise to an object: {other}",
        self.entity()
      )))),
    }
  }
}

/// Deserialise a patch field where an explicit `null` means "clear" and an
/// absent key means "leave alone". Pair with `#[serde(default)]`.
pub(crate) fn double_option<'de, D, T>(
  deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
  D: serde::Deserializer<'de>,
  T: serde::Deserialize<'de>,
{
  serde::Deserialize::deserialize(deserializer).map(Some)
}
