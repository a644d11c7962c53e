//! [`SqliteStore`], the SQLite implementation of [`CatalogStore`].

use std::{path::Path, time::Duration};

use rusqlite::params;
use tracing::{debug, info};

use holonet_core::{
  Entity,
  Error as CoreError,
  character::{Character, CharacterPatch, NewCharacter},
  favorite::{Favorite, FavoriteKind, FavoritePatch, FavoriteTarget, UserFavorites},
  planet::{NewPlanet, Planet, PlanetPatch},
  starship::{NewStarship, Starship, StarshipPatch},
  store::{
    CatalogStore, CharacterQuery, FavoriteQuery, PlanetQuery, StarshipQuery,
    UserQuery,
  },
  user::{NewUser, User, UserPatch},
  validate,
};

use crate::{
  Result,
  config::StoreConfig,
  encode::{
    CHARACTER_SELECT, FAVORITE_UNION, PLANET_SELECT, RawFavorite,
    STARSHIP_SELECT, USER_SELECT, character_from_row, encode_limit,
    encode_offset, encode_pattern, favorite_column, favorite_table,
    planet_from_row, starship_from_row, user_from_row,
  },
  error::reject,
  password, query,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A catalog store backed by a single SQLite database.
///
/// Cloning is cheap; the inner connection is reference-counted. All clones
/// share one connection thread, so operations are serialised and each runs
/// to completion before the next starts.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let shown = path.as_ref().display().to_string();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    info!(path = %shown, "opened catalog store");
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    info!("opened in-memory catalog store");
    Ok(store)
  }

  /// Open the store described by `config`.
  pub async fn from_config(config: &StoreConfig) -> Result<Self> {
    let store = if config.is_in_memory() {
      Self::open_in_memory().await?
    } else {
      Self::open(&config.path).await?
    };

    let timeout = Duration::from_millis(config.busy_timeout_ms);
    store
      .conn
      .call(move |conn| {
        conn.busy_timeout(timeout)?;
        Ok(())
      })
      .await?;
    Ok(store)
  }

  /// Shut the connection thread down. Other clones of this store fail with
  /// a database error afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    info!("closed catalog store");
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let NewUser { name, email, password: plain, is_active } = input.validate()?;
    let password_hash = password::hash_blocking(plain).await?;

    let user = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (name, email, password_hash, is_active)
           VALUES (?1, ?2, ?3, ?4)",
          params![name, email, password_hash, is_active],
        )?;
        Ok(User { id: conn.last_insert_rowid(), name, email, is_active })
      })
      .await?;

    debug!(user_id = user.id, "created user");
    Ok(user)
  }

  async fn get_user(&self, id: i64) -> Result<User> {
    Ok(self.conn.call(move |conn| query::user(conn, id)).await?)
  }

  async fn list_users(&self, q: UserQuery) -> Result<Vec<User>> {
    let limit = encode_limit(q.limit);
    let offset = encode_offset(q.offset);

    let users = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "{USER_SELECT}
           WHERE (?1 IS NULL OR u.is_active = ?1)
           ORDER BY u.id LIMIT ?2 OFFSET ?3"
        );
        Ok(query::all(
          conn,
          &sql,
          params![q.is_active, limit, offset],
          user_from_row,
        )?)
      })
      .await?;
    Ok(users)
  }

  async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User> {
    let UserPatch { name, email, password: plain, is_active } = patch.validate()?;
    let password_hash = match plain {
      Some(plain) => Some(password::hash_blocking(plain).await?),
      None => None,
    };

    let user = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current = query::user(&tx, id)?;
        let updated = User {
          id,
          name: name.unwrap_or(current.name),
          email: email.unwrap_or(current.email),
          is_active: is_active.unwrap_or(current.is_active),
        };
        tx.execute(
          "UPDATE users
           SET name = ?1, email = ?2, is_active = ?3,
               password_hash = COALESCE(?4, password_hash)
           WHERE id = ?5",
          params![updated.name, updated.email, updated.is_active, password_hash, id],
        )?;
        tx.commit()?;
        Ok(updated)
      })
      .await?;

    debug!(user_id = id, "updated user");
    Ok(user)
  }

  async fn delete_user(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| query::delete(conn, "users", Entity::User, id))
      .await?;
    debug!(user_id = id, "deleted user and their favorites");
    Ok(())
  }

  async fn verify_credentials(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Option<User>> {
    let email = email.trim().to_owned();
    let found = self
      .conn
      .call(move |conn| Ok(query::login(conn, &email)?))
      .await?;

    let Some((user, hash)) = found.filter(|(user, _)| user.is_active) else {
      return Ok(None);
    };
    let verified = password::verify_blocking(password.to_owned(), hash).await?;
    Ok(verified.then_some(user))
  }

  // ── Planets ───────────────────────────────────────────────────────────────

  async fn create_planet(&self, input: NewPlanet) -> Result<Planet> {
    let NewPlanet { name, weather } = input.validate()?;

    let planet = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO planets (name, weather) VALUES (?1, ?2)",
          params![name, weather],
        )?;
        Ok(Planet {
          id: conn.last_insert_rowid(),
          name,
          weather,
          residents_count: 0,
        })
      })
      .await?;

    debug!(planet_id = planet.id, "created planet");
    Ok(planet)
  }

  async fn get_planet(&self, id: i64) -> Result<Planet> {
    Ok(self.conn.call(move |conn| query::planet(conn, id)).await?)
  }

  async fn list_planets(&self, q: PlanetQuery) -> Result<Vec<Planet>> {
    let name = encode_pattern(q.name.as_deref());
    let limit = encode_limit(q.limit);
    let offset = encode_offset(q.offset);

    let planets = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "{PLANET_SELECT}
           WHERE (?1 IS NULL OR p.name LIKE ?1 ESCAPE '\\')
           ORDER BY p.id LIMIT ?2 OFFSET ?3"
        );
        Ok(query::all(conn, &sql, params![name, limit, offset], planet_from_row)?)
      })
      .await?;
    Ok(planets)
  }

  async fn update_planet(&self, id: i64, patch: PlanetPatch) -> Result<Planet> {
    let PlanetPatch { name, weather } = patch.validate()?;

    let planet = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current = query::planet(&tx, id)?;
        let updated = Planet {
          name: name.unwrap_or(current.name),
          weather: weather.unwrap_or(current.weather),
          ..current
        };
        tx.execute(
          "UPDATE planets SET name = ?1, weather = ?2 WHERE id = ?3",
          params![updated.name, updated.weather, id],
        )?;
        tx.commit()?;
        Ok(updated)
      })
      .await?;

    debug!(planet_id = id, "updated planet");
    Ok(planet)
  }

  async fn delete_planet(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| query::delete(conn, "planets", Entity::Planet, id))
      .await?;
    debug!(planet_id = id, "deleted planet");
    Ok(())
  }

  // ── Starships ─────────────────────────────────────────────────────────────

  async fn create_starship(&self, input: NewStarship) -> Result<Starship> {
    let NewStarship { name, model, manufacturer } = input.validate()?;

    let starship = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO starships (name, model, manufacturer) VALUES (?1, ?2, ?3)",
          params![name, model, manufacturer],
        )?;
        Ok(Starship {
          id: conn.last_insert_rowid(),
          name,
          model,
          manufacturer,
          pilot_id: None,
        })
      })
      .await?;

    debug!(starship_id = starship.id, "created starship");
    Ok(starship)
  }

  async fn get_starship(&self, id: i64) -> Result<Starship> {
    Ok(self.conn.call(move |conn| query::starship(conn, id)).await?)
  }

  async fn list_starships(&self, q: StarshipQuery) -> Result<Vec<Starship>> {
    let name = encode_pattern(q.name.as_deref());
    let manufacturer = encode_pattern(q.manufacturer.as_deref());
    let limit = encode_limit(q.limit);
    let offset = encode_offset(q.offset);

    let starships = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "{STARSHIP_SELECT}
           WHERE (?1 IS NULL OR s.name LIKE ?1 ESCAPE '\\')
             AND (?2 IS NULL OR s.manufacturer LIKE ?2 ESCAPE '\\')
           ORDER BY s.id LIMIT ?3 OFFSET ?4"
        );
        Ok(query::all(
          conn,
          &sql,
          params![name, manufacturer, limit, offset],
          starship_from_row,
        )?)
      })
      .await?;
    Ok(starships)
  }

  async fn update_starship(&self, id: i64, patch: StarshipPatch) -> Result<Starship> {
    let StarshipPatch { name, model, manufacturer } = patch.validate()?;

    let starship = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current = query::starship(&tx, id)?;
        let updated = Starship {
          name: name.unwrap_or(current.name),
          model: model.unwrap_or(current.model),
          manufacturer: manufacturer.unwrap_or(current.manufacturer),
          ..current
        };
        tx.execute(
          "UPDATE starships SET name = ?1, model = ?2, manufacturer = ?3 WHERE id = ?4",
          params![updated.name, updated.model, updated.manufacturer, id],
        )?;
        tx.commit()?;
        Ok(updated)
      })
      .await?;

    debug!(starship_id = id, "updated starship");
    Ok(starship)
  }

  async fn delete_starship(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| query::delete(conn, "starships", Entity::Starship, id))
      .await?;
    debug!(starship_id = id, "deleted starship");
    Ok(())
  }

  async fn assign_pilot(&self, starship_id: i64, character_id: i64) -> Result<Starship> {
    let starship = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let starship = query::starship(&tx, starship_id)?;
        let character = query::character(&tx, character_id)?;

        if let Some(pilot_id) = starship.pilot_id
          && pilot_id != character_id
        {
          return Err(reject(CoreError::ConstraintViolation(format!(
            "starship {starship_id} is already piloted by character {pilot_id}"
          ))));
        }
        if let Some(other) = character.starship_id
          && other != starship_id
        {
          return Err(reject(CoreError::ConstraintViolation(format!(
            "character {character_id} already pilots starship {other}"
          ))));
        }

        tx.execute(
          "UPDATE characters SET starship_id = ?1 WHERE id = ?2",
          params![starship_id, character_id],
        )?;
        tx.commit()?;
        Ok(Starship { pilot_id: Some(character_id), ..starship })
      })
      .await?;

    debug!(starship_id, character_id, "assigned pilot");
    Ok(starship)
  }

  async fn unassign_pilot(&self, starship_id: i64) -> Result<Starship> {
    let starship = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let starship = query::starship(&tx, starship_id)?;
        tx.execute(
          "UPDATE characters SET starship_id = NULL WHERE starship_id = ?1",
          params![starship_id],
        )?;
        tx.commit()?;
        Ok(Starship { pilot_id: None, ..starship })
      })
      .await?;

    debug!(starship_id, "unassigned pilot");
    Ok(starship)
  }

  // ── Characters ────────────────────────────────────────────────────────────

  async fn create_character(&self, input: NewCharacter) -> Result<Character> {
    let NewCharacter { name, height, residence_planet_id, starship_id } =
      input.validate()?;

    let character = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO characters (name, height, residence_planet_id, starship_id)
           VALUES (?1, ?2, ?3, ?4)",
          params![name, height, residence_planet_id, starship_id],
        )?;
        Ok(Character {
          id: conn.last_insert_rowid(),
          name,
          height,
          residence_planet_id,
          starship_id,
        })
      })
      .await?;

    debug!(character_id = character.id, "created character");
    Ok(character)
  }

  async fn get_character(&self, id: i64) -> Result<Character> {
    Ok(self.conn.call(move |conn| query::character(conn, id)).await?)
  }

  async fn list_characters(&self, q: CharacterQuery) -> Result<Vec<Character>> {
    let name = encode_pattern(q.name.as_deref());
    let limit = encode_limit(q.limit);
    let offset = encode_offset(q.offset);

    let characters = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "{CHARACTER_SELECT}
           WHERE (?1 IS NULL OR c.name LIKE ?1 ESCAPE '\\')
             AND (?2 IS NULL OR c.residence_planet_id = ?2)
             AND (?3 IS NULL OR c.starship_id = ?3)
           ORDER BY c.id LIMIT ?4 OFFSET ?5"
        );
        Ok(query::all(
          conn,
          &sql,
          params![name, q.residence_planet_id, q.starship_id, limit, offset],
          character_from_row,
        )?)
      })
      .await?;
    Ok(characters)
  }

  async fn update_character(&self, id: i64, patch: CharacterPatch) -> Result<Character> {
    let CharacterPatch { name, height, residence_planet_id, starship_id } =
      patch.validate()?;

    let character = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current = query::character(&tx, id)?;
        let updated = Character {
          id,
          name: name.unwrap_or(current.name),
          height: height.unwrap_or(current.height),
          residence_planet_id: residence_planet_id
            .unwrap_or(current.residence_planet_id),
          starship_id: starship_id.unwrap_or(current.starship_id),
        };
        tx.execute(
          "UPDATE characters
           SET name = ?1, height = ?2, residence_planet_id = ?3, starship_id = ?4
           WHERE id = ?5",
          params![
            updated.name,
            updated.height,
            updated.residence_planet_id,
            updated.starship_id,
            id,
          ],
        )?;
        tx.commit()?;
        Ok(updated)
      })
      .await?;

    debug!(character_id = id, "updated character");
    Ok(character)
  }

  async fn delete_character(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| query::delete(conn, "characters", Entity::Character, id))
      .await?;
    debug!(character_id = id, "deleted character");
    Ok(())
  }

  // ── Favorites ─────────────────────────────────────────────────────────────

  async fn add_favorite(&self, user_id: i64, target: FavoriteTarget) -> Result<Favorite> {
    let user_id = validate::id("user_id", user_id)?;
    let target = target.validate()?;
    let kind = target.kind();

    let favorite = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "INSERT INTO {} (user_id, {}) VALUES (?1, ?2)",
          favorite_table(kind),
          favorite_column(kind),
        );
        conn.execute(&sql, params![user_id, target.id()])?;
        Ok(Favorite { id: conn.last_insert_rowid(), user_id, target })
      })
      .await?;

    debug!(user_id, %target, favorite_id = favorite.id, "added favorite");
    Ok(favorite)
  }

  async fn get_favorite(&self, kind: FavoriteKind, id: i64) -> Result<Favorite> {
    Ok(self.conn.call(move |conn| query::favorite(conn, kind, id)).await?)
  }

  async fn list_favorites(&self, q: FavoriteQuery) -> Result<Vec<Favorite>> {
    let kind = q.kind.map(FavoriteKind::as_str);
    let limit = encode_limit(q.limit);
    let offset = encode_offset(q.offset);

    let raws: Vec<RawFavorite> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT kind, id, user_id, target_id FROM ({FAVORITE_UNION})
           WHERE (?1 IS NULL OR user_id = ?1)
             AND (?2 IS NULL OR kind = ?2)
           ORDER BY CASE kind
                      WHEN 'character' THEN 0
                      WHEN 'planet'    THEN 1
                      ELSE 2
                    END,
                    id
           LIMIT ?3 OFFSET ?4"
        );
        Ok(query::all(
          conn,
          &sql,
          params![q.user_id, kind, limit, offset],
          RawFavorite::from_row,
        )?)
      })
      .await?;

    raws.into_iter().map(RawFavorite::into_favorite).collect()
  }

  async fn update_favorite(
    &self,
    kind: FavoriteKind,
    id: i64,
    patch: FavoritePatch,
  ) -> Result<Favorite> {
    let patch = patch.validate()?;

    let favorite = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current = query::favorite(&tx, kind, id)?;
        let updated = Favorite {
          id,
          user_id: patch.user_id.unwrap_or(current.user_id),
          target:  FavoriteTarget::new(
            kind,
            patch.target_id.unwrap_or(current.target.id()),
          ),
        };
        let sql = format!(
          "UPDATE {} SET user_id = ?1, {} = ?2 WHERE id = ?3",
          favorite_table(kind),
          favorite_column(kind),
        );
        tx.execute(&sql, params![updated.user_id, updated.target.id(), id])?;
        tx.commit()?;
        Ok(updated)
      })
      .await?;

    debug!(favorite_id = id, kind = kind.as_str(), "updated favorite");
    Ok(favorite)
  }

  async fn remove_favorite(&self, kind: FavoriteKind, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        query::delete(conn, favorite_table(kind), Entity::Favorite(kind), id)
      })
      .await?;
    debug!(favorite_id = id, kind = kind.as_str(), "removed favorite");
    Ok(())
  }

  async fn remove_favorite_target(&self, user_id: i64, target: FavoriteTarget) -> Result<()> {
    let kind = target.kind();

    self
      .conn
      .call(move |conn| {
        let sql = format!(
          "DELETE FROM {} WHERE user_id = ?1 AND {} = ?2",
          favorite_table(kind),
          favorite_column(kind),
        );
        match conn.execute(&sql, params![user_id, target.id()])? {
          0 => Err(reject(CoreError::NotFavorited { user_id, target })),
          _ => Ok(()),
        }
      })
      .await?;

    debug!(user_id, %target, "removed favorite");
    Ok(())
  }

  async fn favorites_of(&self, user_id: i64) -> Result<UserFavorites> {
    let favorites = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        query::user(&tx, user_id)?;

        let mut favorites = UserFavorites::new(user_id);
        for kind in FavoriteKind::ALL {
          for favorite in query::favorites_by_user(&tx, kind, user_id)? {
            favorites.push(favorite);
          }
        }
        tx.commit()?;
        Ok(favorites)
      })
      .await?;
    Ok(favorites)
  }
}
