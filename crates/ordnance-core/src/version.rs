//! The upstream version marker.
//!
//! The marker is an opaque token copied from the upstream "last change" cell.
//! It is only ever compared for equality.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An opaque upstream version token, e.g. `2.47.0.123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionMarker(String);

impl VersionMarker {
  pub fn new(token: impl Into<String>) -> Self { Self(token.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for VersionMarker {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for VersionMarker {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

/// The persisted "current version" singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
  pub version:     VersionMarker,
  /// When the store accepted this marker.
  pub recorded_at: DateTime<Utc>,
}
