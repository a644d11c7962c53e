//! Favorites: join rows linking a user to a character, planet or starship.
//!
//! Each kind lives in its own table with a UNIQUE (user, target) pair, but
//! they share one Rust shape. [`FavoriteTarget`] carries both the kind and the
//! target id, and flattens into the serialised record as `character_id`,
//! `planet_id` or `starship_id`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  record::{Entity, PublicRecord},
  validate,
};

// ─── Kind / target ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteKind {
  Character,
  Planet,
  Starship,
}

impl FavoriteKind {
  pub const ALL: [FavoriteKind; 3] = [Self::Character, Self::Planet, Self::Starship];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Character => "character",
      Self::Planet => "planet",
      Self::Starship => "starship",
    }
  }

  /// Name of the id field the target is serialised under.
  pub fn target_field(self) -> &'static str {
    match self {
      Self::Character => "character_id",
      Self::Planet => "planet_id",
      Self::Starship => "starship_id",
    }
  }
}

impl FromStr for FavoriteKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|kind| kind.as_str() == s)
      .ok_or_else(|| Error::invalid("kind", format!("unknown favorite kind {s:?}")))
  }
}

/// The thing being favorited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FavoriteTarget {
  #[serde(rename = "character_id")]
  Character(i64),
  #[serde(rename = "planet_id")]
  Planet(i64),
  #[serde(rename = "starship_id")]
  Starship(i64),
}

impl FavoriteTarget {
  pub fn new(kind: FavoriteKind, id: i64) -> Self {
    match kind {
      FavoriteKind::Character => Self::Character(id),
      FavoriteKind::Planet => Self::Planet(id),
      FavoriteKind::Starship => Self::Starship(id),
    }
  }

  pub fn kind(self) -> FavoriteKind {
    match self {
      Self::Character(_) => FavoriteKind::Character,
      Self::Planet(_) => FavoriteKind::Planet,
      Self::Starship(_) => FavoriteKind::Starship,
    }
  }

  pub fn id(self) -> i64 {
    match self {
      Self::Character(id) | Self::Planet(id) | Self::Starship(id) => id,
    }
  }

  /// The [`Entity`] the target id refers to.
  pub fn entity(self) -> Entity {
    match self {
      Self::Character(_) => Entity::Character,
      Self::Planet(_) => Entity::Planet,
      Self::Starship(_) => Entity::Starship,
    }
  }

  pub fn validate(self) -> Result<Self> {
    validate::id(self.kind().target_field(), self.id())?;
    Ok(self)
  }
}

impl fmt::Display for FavoriteTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.kind().as_str(), self.id())
  }
}

// ─── Favorite ────────────────────────────────────────────────────────────────

/// A stored favorite row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
  pub id:      i64,
  pub user_id: i64,
  #[serde(flatten)]
  pub target:  FavoriteTarget,
}

impl Favorite {
  pub fn kind(&self) -> FavoriteKind { self.target.kind() }
}

impl PublicRecord for Favorite {
  fn entity(&self) -> Entity { Entity::Favorite(self.kind()) }

  fn id(&self) -> i64 { self.id }
}

/// Partial update of a favorite row. The kind (and so the table) is fixed;
/// only the ids move.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FavoritePatch {
  pub user_id:   Option<i64>,
  pub target_id: Option<i64>,
}

impl FavoritePatch {
  pub fn validate(self) -> Result<Self> {
    Ok(Self {
      user_id:   self.user_id.map(|id| validate::id("user_id", id)).transpose()?,
      target_id: self
        .target_id
        .map(|id| validate::id("target_id", id))
        .transpose()?,
    })
  }
}

/// Every favorite a user holds, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFavorites {
  pub user_id:    i64,
  pub characters: Vec<Favorite>,
  pub planets:    Vec<Favorite>,
  pub starships:  Vec<Favorite>,
}

impl UserFavorites {
  pub fn new(user_id: i64) -> Self {
    Self { user_id, ..Default::default() }
  }

  /// File `favorite` under its kind.
  pub fn push(&mut self, favorite: Favorite) {
    match favorite.kind() {
      FavoriteKind::Character => self.characters.push(favorite),
      FavoriteKind::Planet => self.planets.push(favorite),
      FavoriteKind::Starship => self.starships.push(favorite),
    }
  }

  pub fn len(&self) -> usize {
    self.characters.len() + self.planets.len() + self.starships.len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_parses_from_its_own_name() {
    for kind in FavoriteKind::ALL {
      assert_eq!(kind.as_str().parse::<FavoriteKind>().unwrap(), kind);
    }
    assert!(matches!(
      "droid".parse::<FavoriteKind>(),
      Err(Error::Validation { field: "kind", .. })
    ));
  }

  #[test]
  fn favorite_serialises_with_kind_specific_field() {
    let fav = Favorite {
      id:      10,
      user_id: 1,
      target:  FavoriteTarget::Planet(2),
    };
    assert_eq!(
      serde_json::Value::Object(fav.to_public_map().unwrap()),
      serde_json::json!({ "id": 10, "user_id": 1, "planet_id": 2 })
    );
  }

  #[test]
  fn favorite_deserialises_from_public_shape() {
    let fav: Favorite = serde_json::from_value(serde_json::json!({
      "id": 4, "user_id": 1, "starship_id": 12
    }))
    .unwrap();
    assert_eq!(fav.target, FavoriteTarget::Starship(12));
    assert_eq!(fav.entity(), Entity::Favorite(FavoriteKind::Starship));
  }

  #[test]
  fn target_parts() {
    let target = FavoriteTarget::new(FavoriteKind::Character, 8);
    assert_eq!(target, FavoriteTarget::Character(8));
    assert_eq!(target.kind().target_field(), "character_id");
    assert_eq!(target.entity(), Entity::Character);
    assert!(FavoriteTarget::Planet(0).validate().is_err());
  }

  #[test]
  fn user_favorites_groups_by_kind() {
    let mut all = UserFavorites::new(1);
    for (id, target) in [
      (1, FavoriteTarget::Character(3)),
      (1, FavoriteTarget::Starship(4)),
      (2, FavoriteTarget::Character(5)),
    ] {
      all.push(Favorite { id, user_id: 1, target });
    }
    assert_eq!(all.characters.len(), 2);
    assert!(all.planets.is_empty());
    assert_eq!(all.starships.len(), 1);
    assert_eq!(all.len(), 3);
  }
}
