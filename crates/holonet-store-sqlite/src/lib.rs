//! SQLite backend for the Holonet favorites catalog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Referential integrity, uniqueness and
//! cascades are declared in the schema and enforced by SQLite itself; this
//! crate only translates the resulting failures into the catalog taxonomy.

mod encode;
mod password;
mod query;
mod schema;
mod store;

pub mod config;
pub mod error;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use store::SqliteStore;
