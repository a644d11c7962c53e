//! Core types and trait definitions for the Holonet favorites catalog.
//!
//! Nothing here touches HTTP or a database. The crate defines the records
//! (users, planets, starships, characters, favorites), their validated
//! inputs, the public serialised view of each record, and the
//! [`store::CatalogStore`] trait that backends implement.

pub mod character;
pub mod error;
pub mod favorite;
pub mod planet;
pub mod record;
pub mod starship;
pub mod store;
pub mod user;
pub mod validate;

pub use error::{Classify, Error, ErrorKind, Result};
pub use record::{Entity, PublicRecord};
