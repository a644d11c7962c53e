//! Planets and their derived resident count.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  record::{Entity, PublicRecord},
  validate,
};

pub const NAME_MAX: usize = 100;
pub const WEATHER_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
  pub id:              i64,
  pub name:            String,
  /// Climate descriptor, e.g. "arid" or "temperate".
  pub weather:         String,
  /// Number of characters residing here; computed at read time.
  pub residents_count: i64,
}

impl PublicRecord for Planet {
  fn entity(&self) -> Entity { Entity::Planet }

  fn id(&self) -> i64 { self.id }
}

/// Missing fields deserialise as empty and then fail [`NewPlanet::validate`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlanet {
  #[serde(default)]
  pub name:    String,
  #[serde(default)]
  pub weather: String,
}

impl NewPlanet {
  pub fn new(name: impl Into<String>, weather: impl Into<String>) -> Self {
    Self { name: name.into(), weather: weather.into() }
  }

  pub fn validate(self) -> Result<Self> {
    Ok(Self {
      name:    validate::required("name", &self.name, NAME_MAX)?,
      weather: validate::required("weather", &self.weather, WEATHER_MAX)?,
    })
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanetPatch {
  pub name:    Option<String>,
  pub weather: Option<String>,
}

impl PlanetPatch {
  pub fn validate(self) -> Result<Self> {
    Ok(Self {
      name:    self
        .name
        .map(|n| validate::required("name", &n, NAME_MAX))
        .transpose()?,
      weather: self
        .weather
        .map(|w| validate::required("weather", &w, WEATHER_MAX))
        .transpose()?,
    })
  }
}
