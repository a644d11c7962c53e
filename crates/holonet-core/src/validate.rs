//! Field validation applied before any input reaches a store.
//!
//! Limits mirror the column widths of the catalog tables and are counted in
//! characters, not bytes.

use crate::{Error, Result};

/// A required string: trimmed, non-blank, and at most `max_chars` long.
pub fn required(
  field: &'static str,
  value: &str,
  max_chars: usize,
) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::invalid(field, "must not be blank"));
  }
  check_len(field, trimmed, max_chars)?;
  Ok(trimmed.to_owned())
}

pub fn email(value: &str, max_chars: usize) -> Result<String> {
  let email = required("email", value, max_chars)?;
  let malformed = match email.split_once('@') {
    Some((local, domain)) => {
      local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
    }
    None => true,
  };
  if malformed {
    return Err(Error::invalid("email", format!("{email:?} is not an address")));
  }
  Ok(email)
}

/// Passwords are hashed, never stored, so only emptiness is checked.
pub fn password(value: &str) -> Result<()> {
  if value.is_empty() {
    return Err(Error::invalid("password", "must not be empty"));
  }
  Ok(())
}

/// Ids handed in by callers must at least be positive.
pub fn id(field: &'static str, value: i64) -> Result<i64> {
  if value <= 0 {
    return Err(Error::invalid(field, format!("{value} is not a valid id")));
  }
  Ok(value)
}

fn check_len(field: &'static str, value: &str, max_chars: usize) -> Result<()> {
  let len = value.chars().count();
  if len > max_chars {
    return Err(Error::invalid(
      field,
      format!("{len} characters exceeds the limit of {max_chars}"),
    ));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn required_trims_and_rejects_blank() {
    assert_eq!(required("name", "  Tatooine ", 100).unwrap(), "Tatooine");
    assert!(matches!(
      required("name", "   ", 100),
      Err(Error::Validation { field: "name", .. })
    ));
  }

  #[test]
  fn length_counts_characters() {
    // 10 characters, 20 bytes.
    let height = "ééééééééé1";
    assert!(required("height", height, 10).is_ok());
    assert!(required("height", "12345678901", 10).is_err());
  }

  #[test]
  fn email_shapes() {
    assert_eq!(email(" leia@rebels.org ", 120).unwrap(), "leia@rebels.org");
    for bad in ["", "leia", "@rebels.org", "leia@", "le ia@rebels.org", "a@b@c"] {
      assert!(email(bad, 120).is_err(), "{bad:?} should be rejected");
    }
  }

  #[test]
  fn ids_must_be_positive() {
    assert!(id("planet_id", 1).is_ok());
    assert!(id("planet_id", 0).is_err());
    assert!(id("planet_id", -4).is_err());
  }
}
