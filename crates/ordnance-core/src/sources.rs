//! The source map: which sheet to fetch for each weapon category.
//!
//! Loaded once at start-up and passed by value (usually behind an `Arc`) to
//! everything that needs it. Never mutated afterwards.

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;

use crate::{Error, Result};

/// Immutable (category → URL) table plus the URL of the version-marker sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceMap {
  version: String,
  tables:  BTreeMap<String, String>,
}

impl SourceMap {
  /// Build and validate a source map.
  pub fn new(
    version_url: impl Into<String>,
    tables: impl IntoIterator<Item = (String, String)>,
  ) -> Result<Self> {
    let map = Self { version: version_url.into(), tables: tables.into_iter().collect() };
    map.validate()?;
    Ok(map)
  }

  /// Decode a source map from its JSON form:
  ///
  /// ```json
  /// { "version": "https://…", "tables": { "aam-ir": "https://…" } }
  /// ```
  pub fn from_json(json: &str) -> Result<Self> {
    let map: Self = serde_json::from_str(json)?;
    map.validate()?;
    Ok(map)
  }

  /// Read and decode the source map file at `path`.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| Error::SourceMapRead {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&json)
  }

  fn validate(&self) -> Result<()> {
    if self.version.trim().is_empty() {
      return Err(Error::NoVersionUrl);
    }
    if self.tables.is_empty() {
      return Err(Error::NoTables);
    }
    for (category, url) in &self.tables {
      if category.trim().is_empty() || url.trim().is_empty() {
        return Err(Error::EmptySourceEntry(category.clone()));
      }
    }
    Ok(())
  }

  /// URL of the sheet carrying the "last change" marker.
  pub fn version_url(&self) -> &str { &self.version }

  /// All (category, url) pairs, ordered by category.
  pub fn tables(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
    self.tables.iter().map(|(c, u)| (c.as_str(), u.as_str()))
  }

  pub fn contains_category(&self, category: &str) -> bool {
    self.tables.contains_key(category)
  }

  pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
    self.tables.keys().map(String::as_str)
  }

  /// Number of tables, i.e. the aggregator's fan-out width.
  pub fn len(&self) -> usize { self.tables.len() }

  pub fn is_empty(&self) -> bool { self.tables.is_empty() }
}
