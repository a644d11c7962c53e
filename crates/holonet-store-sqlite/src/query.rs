//! Blocking lookups shared by the `Connection::call` closures in
//! [`crate::store`].
//!
//! Every function takes a plain `&Connection`, so it works the same on the
//! connection itself and on an open transaction. Single-row fetches fail with
//! a core `NotFound` (via [`reject`]) instead of returning `Option`.

use holonet_core::{
  Entity,
  Error as CoreError,
  character::Character,
  favorite::{Favorite, FavoriteKind},
  planet::Planet,
  starship::Starship,
  user::User,
};
use rusqlite::{Connection, OptionalExtension as _, Params, Row};

use crate::{
  encode::{
    CHARACTER_SELECT, PLANET_SELECT, STARSHIP_SELECT, USER_SELECT,
    character_from_row, favorite_column, favorite_from_row, favorite_table,
    planet_from_row, starship_from_row, user_from_row,
  },
  error::reject,
};

/// Run `sql` and map every row.
pub fn all<T, P, F>(conn: &Connection, sql: &str, params: P, f: F) -> rusqlite::Result<Vec<T>>
where
  P: Params,
  F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
  let mut stmt = conn.prepare(sql)?;
  let rows = stmt
    .query_map(params, f)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn one<T, F>(
  conn: &Connection,
  sql: &str,
  id: i64,
  entity: Entity,
  f: F,
) -> tokio_rusqlite::Result<T>
where
  F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
  conn
    .query_row(sql, rusqlite::params![id], f)
    .optional()?
    .ok_or_else(|| reject(CoreError::not_found(entity, id)))
}

// ─── Single records ──────────────────────────────────────────────────────────

pub fn user(conn: &Connection, id: i64) -> tokio_rusqlite::Result<User> {
  let sql = format!("{USER_SELECT} WHERE u.id = ?1");
  one(conn, &sql, id, Entity::User, user_from_row)
}

pub fn planet(conn: &Connection, id: i64) -> tokio_rusqlite::Result<Planet> {
  let sql = format!("{PLANET_SELECT} WHERE p.id = ?1");
  one(conn, &sql, id, Entity::Planet, planet_from_row)
}

pub fn starship(conn: &Connection, id: i64) -> tokio_rusqlite::Result<Starship> {
  let sql = format!("{STARSHIP_SELECT} WHERE s.id = ?1");
  one(conn, &sql, id, Entity::Starship, starship_from_row)
}

pub fn character(conn: &Connection, id: i64) -> tokio_rusqlite::Result<Character> {
  let sql = format!("{CHARACTER_SELECT} WHERE c.id = ?1");
  one(conn, &sql, id, Entity::Character, character_from_row)
}

pub fn favorite(
  conn: &Connection,
  kind: FavoriteKind,
  id: i64,
) -> tokio_rusqlite::Result<Favorite> {
  let sql = format!(
    "SELECT id, user_id, {} FROM {} WHERE id = ?1",
    favorite_column(kind),
    favorite_table(kind),
  );
  one(conn, &sql, id, Entity::Favorite(kind), favorite_from_row(kind))
}

// ─── Relationship lookups ────────────────────────────────────────────────────

/// The user row plus its stored password hash, looked up by email.
pub fn login(conn: &Connection, email: &str) -> rusqlite::Result<Option<(User, String)>> {
  conn
    .query_row(
      "SELECT id, name, email, is_active, password_hash FROM users WHERE email = ?1",
      rusqlite::params![email],
      |row| Ok((user_from_row(row)?, row.get(4)?)),
    )
    .optional()
}

/// All favorites of `user_id` in one table, ordered by id.
pub fn favorites_by_user(
  conn: &Connection,
  kind: FavoriteKind,
  user_id: i64,
) -> rusqlite::Result<Vec<Favorite>> {
  let sql = format!(
    "SELECT id, user_id, {} FROM {} WHERE user_id = ?1 ORDER BY id",
    favorite_column(kind),
    favorite_table(kind),
  );
  all(conn, &sql, rusqlite::params![user_id], favorite_from_row(kind))
}

/// Delete one row by id, failing with `NotFound` if nothing was deleted.
pub fn delete(
  conn: &Connection,
  table: &str,
  entity: Entity,
  id: i64,
) -> tokio_rusqlite::Result<()> {
  let sql = format!("DELETE FROM {table} WHERE id = ?1");
  match conn.execute(&sql, rusqlite::params![id])? {
    0 => Err(reject(CoreError::not_found(entity, id))),
    _ => Ok(()),
  }
}
