//! Store configuration, layered from an optional file and the environment.
//!
//! ```toml
//! path            = "/var/lib/holonet/catalog.db"
//! busy_timeout_ms = 5000
//! ```
//!
//! Every key can be overridden with a `HOLONET_`-prefixed environment
//! variable, e.g. `HOLONET_PATH=:memory:`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Path that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  pub path:            PathBuf,
  /// How long a statement waits on a locked database before failing.
  pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self { path: PathBuf::from("holonet.db"), busy_timeout_ms: 5_000 }
  }
}

impl StoreConfig {
  pub const ENV_PREFIX: &'static str = "HOLONET";

  /// Read `file` (if given and present), then apply environment overrides.
  /// Missing keys keep their defaults.
  pub fn load(file: Option<&Path>) -> Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(file) = file {
      builder = builder.add_source(config::File::from(file).required(false));
    }
    let settings = builder
      .add_source(config::Environment::with_prefix(Self::ENV_PREFIX))
      .build()?;
    Ok(settings.try_deserialize()?)
  }

  pub fn in_memory() -> Self {
    Self { path: PathBuf::from(IN_MEMORY), ..Self::default() }
  }

  pub fn is_in_memory(&self) -> bool { self.path == Path::new(IN_MEMORY) }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir()
      .join(format!("holonet-{}-{name}.toml", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn file_values_override_defaults() {
    let path = write_temp(
      "full",
      "path = \"/tmp/catalog.db\"\nbusy_timeout_ms = 250\n",
    );
    let cfg = StoreConfig::load(Some(&path)).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.path, PathBuf::from("/tmp/catalog.db"));
    assert_eq!(cfg.busy_timeout_ms, 250);
  }

  #[test]
  fn partial_file_keeps_remaining_defaults() {
    let path = write_temp("partial", "path = \":memory:\"\n");
    let cfg = StoreConfig::load(Some(&path)).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(cfg.is_in_memory());
    assert_eq!(cfg.busy_timeout_ms, StoreConfig::default().busy_timeout_ms);
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let path = std::env::temp_dir().join("holonet-does-not-exist.toml");
    let cfg = StoreConfig::load(Some(&path)).unwrap();
    assert_eq!(cfg.busy_timeout_ms, 5_000);
  }
}
