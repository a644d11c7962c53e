//! Starships and their (at most one) pilot.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  record::{Entity, PublicRecord},
  validate,
};

pub const NAME_MAX: usize = 120;
pub const MODEL_MAX: usize = 120;
pub const MANUFACTURER_MAX: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Starship {
  pub id:           i64,
  pub name:         String,
  pub model:        String,
  pub manufacturer: String,
  /// The character whose pilot link points here. Derived from
  /// `characters.starship_id`; never stored on the starship row.
  pub pilot_id:     Option<i64>,
}

impl PublicRecord for Starship {
  fn entity(&self) -> Entity { Entity::Starship }

  fn id(&self) -> i64 { self.id }
}

/// Missing fields deserialise as empty and then fail [`NewStarship::validate`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewStarship {
  #[serde(default)]
  pub name:         String,
  #[serde(default)]
  pub model:        String,
  #[serde(default)]
  pub manufacturer: String,
}

impl NewStarship {
  pub fn new(
    name: impl Into<String>,
    model: impl Into<String>,
    manufacturer: impl Into<String>,
  ) -> Self {
    Self {
      name:         name.into(),
      model:        model.into(),
      manufacturer: manufacturer.into(),
    }
  }

  pub fn validate(self) -> Result<Self> {
    Ok(Self {
      name:         validate::required("name", &self.name, NAME_MAX)?,
      model:        validate::required("model", &self.model, MODEL_MAX)?,
      manufacturer: validate::required(
        "manufacturer",
        &self.manufacturer,
        MANUFACTURER_MAX,
      )?,
    })
  }
}

/// Partial update. The pilot link is not a starship column; change it with
/// [`crate::store::CatalogStore::assign_pilot`] or via the character.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StarshipPatch {
  pub name:         Option<String>,
  pub model:        Option<String>,
  pub manufacturer: Option<String>,
}

impl StarshipPatch {
  pub fn validate(self) -> Result<Self> {
    Ok(Self {
      name:         self
        .name
        .map(|n| validate::required("name", &n, NAME_MAX))
        .transpose()?,
      model:        self
        .model
        .map(|m| validate::required("model", &m, MODEL_MAX))
        .transpose()?,
      manufacturer: self
        .manufacturer
        .map(|m| validate::required("manufacturer", &m, MANUFACTURER_MAX))
        .transpose()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pilotless_starship_serialises_null_pilot() {
    let ship = Starship {
      id:           5,
      name:         "Millennium Falcon".into(),
      model:        "YT-1300".into(),
      manufacturer: "Corellian Engineering Corporation".into(),
      pilot_id:     None,
    };
    let map = ship.to_public_map().unwrap();
    assert!(map.contains_key("pilot_id"));
    assert!(map["pilot_id"].is_null());
    assert_eq!(map["model"], "YT-1300");
  }

  #[test]
  fn blank_model_is_rejected() {
    let input = NewStarship::new("X-wing", "   ", "Incom Corporation");
    assert!(matches!(
      input.validate(),
      Err(crate::Error::Validation { field: "model", .. })
    ));
  }

  #[test]
  fn missing_manufacturer_is_rejected() {
    let input: NewStarship =
      serde_json::from_str(r#"{"name": "X-wing", "model": "T-65"}"#).unwrap();
    assert!(matches!(
      input.validate(),
      Err(crate::Error::Validation { field: "manufacturer", .. })
    ));
  }
}
