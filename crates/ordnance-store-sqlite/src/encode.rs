//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings. Weapon attributes are compact JSON.

use chrono::{DateTime, Utc};
use ordnance_core::{
  version::{VersionMarker, VersionRecord},
  weapon::{Weapon, WeaponParams},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Wrap `query` as a `%…%` LIKE pattern with `\` as the escape character, so
/// `%` and `_` in the query match literally.
pub fn like_contains(query: &str) -> String {
  let mut pattern = String::with_capacity(query.len() + 2);
  pattern.push('%');
  for c in query.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

/// The search key for a name: full Unicode lowercase, so `Ödön` and `ödön`
/// fold together where SQLite's own `LIKE` would not.
pub fn fold_name(name: &str) -> String { name.to_lowercase() }

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `weapons` row as plain strings.
pub struct RawWeapon {
  pub identity:    String,
  pub category:    String,
  pub name:        String,
  pub name_folded: String,
  pub notes:       String,
  pub params_json: String,
}

impl RawWeapon {
  pub fn from_weapon(w: &Weapon) -> Result<Self> {
    if w.identity.is_empty() {
      return Err(Error::MissingIdentity {
        name:     w.name.clone(),
        category: w.category.clone(),
      });
    }
    Ok(Self {
      identity:    w.identity.clone(),
      category:    w.category.clone(),
      name:        w.name.clone(),
      name_folded: fold_name(&w.name),
      notes:       w.notes.clone(),
      params_json: serde_json::to_string(&w.params)?,
    })
  }

  pub fn into_weapon(self) -> Result<Weapon> {
    let params: WeaponParams = serde_json::from_str(&self.params_json)?;
    Ok(Weapon {
      identity: self.identity,
      name:     self.name,
      category: self.category,
      notes:    self.notes,
      params,
    })
  }
}

/// The `markers` row for the current version.
pub struct RawVersion {
  pub value:       String,
  pub recorded_at: String,
}

impl RawVersion {
  pub fn into_record(self) -> Result<VersionRecord> {
    Ok(VersionRecord {
      version:     VersionMarker::new(self.value),
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
