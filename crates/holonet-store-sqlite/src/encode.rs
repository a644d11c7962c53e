//! Mapping between Rust records and SQLite rows.
//!
//! Ids and nullable descriptors map onto native SQLite types directly. The
//! only text encoding is the favorite kind, which the union query over the
//! three favorite tables reports as a string.

use holonet_core::{
  character::Character,
  favorite::{Favorite, FavoriteKind, FavoriteTarget},
  planet::Planet,
  starship::Starship,
  user::User,
};
use rusqlite::Row;

use crate::Result;

// ─── Select lists ────────────────────────────────────────────────────────────

// Never selects `password_hash`.
pub const USER_SELECT: &str = "SELECT u.id, u.name, u.email, u.is_active FROM users u";

pub const PLANET_SELECT: &str = "
  SELECT p.id, p.name, p.weather,
         (SELECT COUNT(*) FROM characters c WHERE c.residence_planet_id = p.id)
           AS residents_count
  FROM planets p";

pub const STARSHIP_SELECT: &str = "
  SELECT s.id, s.name, s.model, s.manufacturer, c.id AS pilot_id
  FROM starships s
  LEFT JOIN characters c ON c.starship_id = s.id";

pub const CHARACTER_SELECT: &str = "
  SELECT c.id, c.name, c.height, c.residence_planet_id, c.starship_id
  FROM characters c";

/// All three favorite tables as one relation of `(kind, id, user_id,
/// target_id)`.
pub const FAVORITE_UNION: &str = "
  SELECT 'character' AS kind, id, user_id, character_id AS target_id
    FROM favorite_characters
  UNION ALL
  SELECT 'planet', id, user_id, planet_id FROM favorite_planets
  UNION ALL
  SELECT 'starship', id, user_id, starship_id FROM favorite_starships";

// ─── Row mappers ─────────────────────────────────────────────────────────────

pub fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
  Ok(User {
    id:        row.get(0)?,
    name:      row.get(1)?,
    email:     row.get(2)?,
    is_active: row.get(3)?,
  })
}

pub fn planet_from_row(row: &Row<'_>) -> rusqlite::Result<Planet> {
  Ok(Planet {
    id:              row.get(0)?,
    name:            row.get(1)?,
    weather:         row.get(2)?,
    residents_count: row.get(3)?,
  })
}

pub fn starship_from_row(row: &Row<'_>) -> rusqlite::Result<Starship> {
  Ok(Starship {
    id:           row.get(0)?,
    name:         row.get(1)?,
    model:        row.get(2)?,
    manufacturer: row.get(3)?,
    pilot_id:     row.get(4)?,
  })
}

pub fn character_from_row(row: &Row<'_>) -> rusqlite::Result<Character> {
  Ok(Character {
    id:                  row.get(0)?,
    name:                row.get(1)?,
    height:              row.get(2)?,
    residence_planet_id: row.get(3)?,
    starship_id:         row.get(4)?,
  })
}

/// Map a `(id, user_id, target_id)` row of a single favorite table.
pub fn favorite_from_row(
  kind: FavoriteKind,
) -> impl Fn(&Row<'_>) -> rusqlite::Result<Favorite> {
  move |row: &Row<'_>| {
    Ok(Favorite {
      id:      row.get(0)?,
      user_id: row.get(1)?,
      target:  FavoriteTarget::new(kind, row.get(2)?),
    })
  }
}

// ─── FavoriteKind ────────────────────────────────────────────────────────────

pub fn favorite_table(kind: FavoriteKind) -> &'static str {
  match kind {
    FavoriteKind::Character => "favorite_characters",
    FavoriteKind::Planet => "favorite_planets",
    FavoriteKind::Starship => "favorite_starships",
  }
}

/// The target column of a favorite table; equal to the serialised field name.
pub fn favorite_column(kind: FavoriteKind) -> &'static str { kind.target_field() }

/// A row of [`FAVORITE_UNION`], before the kind string is checked.
pub struct RawFavorite {
  pub kind:      String,
  pub id:        i64,
  pub user_id:   i64,
  pub target_id: i64,
}

impl RawFavorite {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      kind:      row.get(0)?,
      id:        row.get(1)?,
      user_id:   row.get(2)?,
      target_id: row.get(3)?,
    })
  }

  pub fn into_favorite(self) -> Result<Favorite> {
    let kind = self.kind.parse::<FavoriteKind>()?;
    Ok(Favorite {
      id:      self.id,
      user_id: self.user_id,
      target:  FavoriteTarget::new(kind, self.target_id),
    })
  }
}

// ─── Paging ──────────────────────────────────────────────────────────────────

/// SQLite reads a negative LIMIT as "no limit".
pub fn encode_limit(limit: Option<usize>) -> i64 {
  limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX))
}

pub fn encode_offset(offset: Option<usize>) -> i64 {
  offset.map_or(0, |o| i64::try_from(o).unwrap_or(i64::MAX))
}

/// `%text%` for a case-insensitive `LIKE … ESCAPE '\'`, or `None` to skip
/// the filter. Wildcards in `text` match literally.
pub fn encode_pattern(text: Option<&str>) -> Option<String> {
  text.map(|t| {
    let mut pattern = String::with_capacity(t.len() + 2);
    pattern.push('%');
    for c in t.chars() {
      if matches!(c, '%' | '_' | '\\') {
        pattern.push('\\');
      }
      pattern.push(c);
    }
    pattern.push('%');
    pattern
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pattern_escapes_like_wildcards() {
    assert_eq!(encode_pattern(Some("oth")).as_deref(), Some("%oth%"));
    assert_eq!(encode_pattern(Some("_")).as_deref(), Some(r"%\_%"));
    assert_eq!(encode_pattern(Some(r"50%\")).as_deref(), Some(r"%50\%\\%"));
    assert_eq!(encode_pattern(None), None);
  }
}
