//! The `CatalogStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `holonet-store-sqlite`).
//! An HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  character::{Character, CharacterPatch, NewCharacter},
  error::Classify,
  favorite::{Favorite, FavoriteKind, FavoritePatch, FavoriteTarget, UserFavorites},
  planet::{NewPlanet, Planet, PlanetPatch},
  starship::{NewStarship, Starship, StarshipPatch},
  user::{NewUser, User, UserPatch},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`CatalogStore::list_users`].
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
  pub is_active: Option<bool>,
  pub limit:     Option<usize>,
  pub offset:    Option<usize>,
}

/// Parameters for [`CatalogStore::list_planets`].
#[derive(Debug, Clone, Default)]
pub struct PlanetQuery {
  /// Case-insensitive substring match on the name.
  pub name:   Option<String>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// Parameters for [`CatalogStore::list_starships`].
#[derive(Debug, Clone, Default)]
pub struct StarshipQuery {
  pub name:         Option<String>,
  pub manufacturer: Option<String>,
  pub limit:        Option<usize>,
  pub offset:       Option<usize>,
}

/// Parameters for [`CatalogStore::list_characters`].
///
/// Filtering on `residence_planet_id` is how a planet's residents are listed.
#[derive(Debug, Clone, Default)]
pub struct CharacterQuery {
  pub name:                Option<String>,
  pub residence_planet_id: Option<i64>,
  pub starship_id:         Option<i64>,
  pub limit:               Option<usize>,
  pub offset:              Option<usize>,
}

/// Parameters for [`CatalogStore::list_favorites`].
#[derive(Debug, Clone, Default)]
pub struct FavoriteQuery {
  pub user_id: Option<i64>,
  pub kind:    Option<FavoriteKind>,
  pub limit:   Option<usize>,
  pub offset:  Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a catalog backend.
///
/// Each method is one atomic operation against the store. Lookups of a
/// missing id fail with [`crate::Error::NotFound`]; broken uniqueness or
/// foreign-key rules fail with [`crate::Error::ConstraintViolation`]; bad
/// input fails with [`crate::Error::Validation`] before the store is touched.
/// Backends expose which of these happened through [`Classify`].
///
/// Listings are ordered by id, which is insertion order.
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn list_users(
    &self,
    query: UserQuery,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn update_user(
    &self,
    id: i64,
    patch: UserPatch,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Delete a user together with all of that user's favorites.
  fn delete_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Check a login. Returns the user only if it exists, is active, and the
  /// password matches the stored hash.
  fn verify_credentials<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Planets ───────────────────────────────────────────────────────────

  fn create_planet(
    &self,
    input: NewPlanet,
  ) -> impl Future<Output = Result<Planet, Self::Error>> + Send + '_;

  fn get_planet(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Planet, Self::Error>> + Send + '_;

  fn list_planets(
    &self,
    query: PlanetQuery,
  ) -> impl Future<Output = Result<Vec<Planet>, Self::Error>> + Send + '_;

  fn update_planet(
    &self,
    id: i64,
    patch: PlanetPatch,
  ) -> impl Future<Output = Result<Planet, Self::Error>> + Send + '_;

  /// Delete a planet. Residents stay, with their residence cleared; favorites
  /// of the planet are removed.
  fn delete_planet(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Starships ─────────────────────────────────────────────────────────

  fn create_starship(
    &self,
    input: NewStarship,
  ) -> impl Future<Output = Result<Starship, Self::Error>> + Send + '_;

  fn get_starship(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Starship, Self::Error>> + Send + '_;

  fn list_starships(
    &self,
    query: StarshipQuery,
  ) -> impl Future<Output = Result<Vec<Starship>, Self::Error>> + Send + '_;

  fn update_starship(
    &self,
    id: i64,
    patch: StarshipPatch,
  ) -> impl Future<Output = Result<Starship, Self::Error>> + Send + '_;

  /// Delete a starship. Its pilot stays, grounded; favorites are removed.
  fn delete_starship(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Make `character_id` the pilot of `starship_id`.
  ///
  /// Fails with a constraint violation if the starship already has another
  /// pilot or the character already pilots another starship. Re-assigning
  /// the current pair is a no-op.
  fn assign_pilot(
    &self,
    starship_id: i64,
    character_id: i64,
  ) -> impl Future<Output = Result<Starship, Self::Error>> + Send + '_;

  /// Clear the pilot link of `starship_id`, if any.
  fn unassign_pilot(
    &self,
    starship_id: i64,
  ) -> impl Future<Output = Result<Starship, Self::Error>> + Send + '_;

  // ── Characters ────────────────────────────────────────────────────────

  fn create_character(
    &self,
    input: NewCharacter,
  ) -> impl Future<Output = Result<Character, Self::Error>> + Send + '_;

  fn get_character(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Character, Self::Error>> + Send + '_;

  fn list_characters(
    &self,
    query: CharacterQuery,
  ) -> impl Future<Output = Result<Vec<Character>, Self::Error>> + Send + '_;

  fn update_character(
    &self,
    id: i64,
    patch: CharacterPatch,
  ) -> impl Future<Output = Result<Character, Self::Error>> + Send + '_;

  fn delete_character(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Favorites ─────────────────────────────────────────────────────────

  /// Record that `user_id` favorites `target`. A repeated pair is a
  /// constraint violation.
  fn add_favorite(
    &self,
    user_id: i64,
    target: FavoriteTarget,
  ) -> impl Future<Output = Result<Favorite, Self::Error>> + Send + '_;

  fn get_favorite(
    &self,
    kind: FavoriteKind,
    id: i64,
  ) -> impl Future<Output = Result<Favorite, Self::Error>> + Send + '_;

  /// List favorites, grouped by kind (characters, planets, starships) and
  /// ordered by id within each kind.
  fn list_favorites(
    &self,
    query: FavoriteQuery,
  ) -> impl Future<Output = Result<Vec<Favorite>, Self::Error>> + Send + '_;

  fn update_favorite(
    &self,
    kind: FavoriteKind,
    id: i64,
    patch: FavoritePatch,
  ) -> impl Future<Output = Result<Favorite, Self::Error>> + Send + '_;

  fn remove_favorite(
    &self,
    kind: FavoriteKind,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove a favorite by its (user, target) pair.
  fn remove_favorite_target(
    &self,
    user_id: i64,
    target: FavoriteTarget,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All favorites of one user. Fails with not-found for an unknown user,
  /// rather than returning an empty bundle.
  fn favorites_of(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<UserFavorites, Self::Error>> + Send + '_;
}
