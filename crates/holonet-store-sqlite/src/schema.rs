//! SQL schema for the Holonet SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision so future migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `foreign_keys` is a per-connection setting, so it lives here rather than
/// in the database file.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL,
    email         TEXT    NOT NULL UNIQUE,
    password_hash TEXT    NOT NULL,   -- argon2 PHC string; never selected by reads
    is_active     INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS planets (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT    NOT NULL UNIQUE,
    weather TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS starships (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT    NOT NULL UNIQUE,
    model        TEXT    NOT NULL,
    manufacturer TEXT    NOT NULL
);

-- The pilot link lives here; UNIQUE gives every starship at most one pilot.
CREATE TABLE IF NOT EXISTS characters (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    name                TEXT    NOT NULL,
    height              TEXT    NOT NULL,
    residence_planet_id INTEGER REFERENCES planets(id)   ON DELETE SET NULL,
    starship_id         INTEGER UNIQUE
                                REFERENCES starships(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS favorite_characters (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL REFERENCES users(id)      ON DELETE CASCADE,
    character_id INTEGER NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    CONSTRAINT uq_user_character UNIQUE (user_id, character_id)
);

CREATE TABLE IF NOT EXISTS favorite_planets (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id   INTEGER NOT NULL REFERENCES users(id)   ON DELETE CASCADE,
    planet_id INTEGER NOT NULL REFERENCES planets(id) ON DELETE CASCADE,
    CONSTRAINT uq_user_planet UNIQUE (user_id, planet_id)
);

CREATE TABLE IF NOT EXISTS favorite_starships (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id)     ON DELETE CASCADE,
    starship_id INTEGER NOT NULL REFERENCES starships(id) ON DELETE CASCADE,
    CONSTRAINT uq_user_starship UNIQUE (user_id, starship_id)
);

-- Child-side indexes for the cascades and reverse lookups.
CREATE INDEX IF NOT EXISTS characters_residence_idx ON characters(residence_planet_id);
CREATE INDEX IF NOT EXISTS fav_characters_target_idx ON favorite_characters(character_id);
CREATE INDEX IF NOT EXISTS fav_planets_target_idx    ON favorite_planets(planet_id);
CREATE INDEX IF NOT EXISTS fav_starships_target_idx  ON favorite_starships(starship_id);

PRAGMA user_version = 1;
";
