//! Characters: planet residents and starship pilots.
//!
//! A character holds both of its references. The planet side of residency
//! and the starship side of the pilot link are computed by query, so there
//! is exactly one stored copy of each relationship.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  record::{Entity, PublicRecord, double_option},
  validate,
};

pub const NAME_MAX: usize = 50;
pub const HEIGHT_MAX: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
  pub id:                  i64,
  pub name:                String,
  /// Free-form, e.g. "172" or "1.72m".
  pub height:              String,
  pub residence_planet_id: Option<i64>,
  /// The starship this character pilots. Unique across characters.
  pub starship_id:         Option<i64>,
}

impl PublicRecord for Character {
  fn entity(&self) -> Entity { Entity::Character }

  fn id(&self) -> i64 { self.id }
}

/// Missing strings deserialise as empty and then fail
/// [`NewCharacter::validate`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewCharacter {
  #[serde(default)]
  pub name:                String,
  #[serde(default)]
  pub height:              String,
  #[serde(default)]
  pub residence_planet_id: Option<i64>,
  #[serde(default)]
  pub starship_id:         Option<i64>,
}

impl NewCharacter {
  pub fn new(name: impl Into<String>, height: impl Into<String>) -> Self {
    Self {
      name:                name.into(),
      height:              height.into(),
      residence_planet_id: None,
      starship_id:         None,
    }
  }

  pub fn validate(self) -> Result<Self> {
    Ok(Self {
      name:                validate::required("name", &self.name, NAME_MAX)?,
      height:              validate::required("height", &self.height, HEIGHT_MAX)?,
      residence_planet_id: self
        .residence_planet_id
        .map(|id| validate::id("residence_planet_id", id))
        .transpose()?,
      starship_id:         self
        .starship_id
        .map(|id| validate::id("starship_id", id))
        .transpose()?,
    })
  }
}

/// Partial update. For the planet and starship references, `Some(None)`
/// clears the link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterPatch {
  pub name:                Option<String>,
  pub height:              Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub residence_planet_id: Option<Option<i64>>,
  #[serde(default, deserialize_with = "double_option")]
  pub starship_id:         Option<Option<i64>>,
}

impl CharacterPatch {
  pub fn validate(self) -> Result<Self> {
    let reference = |field, value: Option<Option<i64>>| {
      value
        .map(|inner| inner.map(|id| validate::id(field, id)).transpose())
        .transpose()
    };

    Ok(Self {
      name:                self
        .name
        .map(|n| validate::required("name", &n, NAME_MAX))
        .transpose()?,
      height:              self
        .height
        .map(|h| validate::required("height", &h, HEIGHT_MAX))
        .transpose()?,
      residence_planet_id: reference(
        "residence_planet_id",
        self.residence_planet_id,
      )?,
      starship_id:         reference("starship_id", self.starship_id)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn serialized_character_shape() {
    let leia = Character {
      id:                  3,
      name:                "Leia Organa".into(),
      height:              "150".into(),
      residence_planet_id: Some(2),
      starship_id:         None,
    };
    assert_eq!(
      serde_json::Value::Object(leia.to_public_map().unwrap()),
      serde_json::json!({
        "id": 3,
        "name": "Leia Organa",
        "height": "150",
        "residence_planet_id": 2,
        "starship_id": null
      })
    );
  }

  #[test]
  fn patch_can_clear_pilot_link() {
    let patch: CharacterPatch =
      serde_json::from_str(r#"{"starship_id": null}"#).unwrap();
    let patch = patch.validate().unwrap();
    assert_eq!(patch.starship_id, Some(None));
    assert_eq!(patch.residence_planet_id, None);
  }

  #[test]
  fn non_positive_reference_is_rejected() {
    let patch = CharacterPatch {
      residence_planet_id: Some(Some(0)),
      ..Default::default()
    };
    assert!(patch.validate().is_err());

    let mut input = NewCharacter::new("Chewbacca", "228");
    input.starship_id = Some(-1);
    assert!(input.validate().is_err());
  }

  #[test]
  fn height_is_required() {
    let missing: NewCharacter =
      serde_json::from_str(r#"{"name": "Yoda"}"#).unwrap();
    assert!(matches!(
      missing.validate(),
      Err(crate::Error::Validation { field: "height", .. })
    ));

    let blank = CharacterPatch { height: Some(" ".into()), ..Default::default() };
    assert!(blank.validate().is_err());
  }
}
