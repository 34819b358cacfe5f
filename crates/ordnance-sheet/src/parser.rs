//! [`TableParser`] and [`MarkerSource`] over a [`TableReader`].

use ordnance_core::{
  upstream::{MarkerSource, TableParser},
  version::VersionMarker,
  weapon::Weapon,
};

use crate::{Error, Result, mapper::map_column, reader::TableReader};

/// Row of the version sheet whose first cell ends with the marker, e.g.
/// `Last change in stats was in 2.47.0.123`.
pub const MARKER_ROW: usize = 3;

// ─── Tables ──────────────────────────────────────────────────────────────────

/// Reads a weapon sheet and maps every named column.
#[derive(Clone)]
pub struct SheetTableParser<R> {
  reader: R,
}

impl<R: TableReader> SheetTableParser<R> {
  pub fn new(reader: R) -> Self { Self { reader } }
}

impl<R: TableReader> TableParser for SheetTableParser<R> {
  type Error = Error;

  async fn parse(&self, category: &str, url: &str) -> Result<Vec<Weapon>> {
    let rows = self.reader.read(url).await?;
    weapons_from_rows(&rows, category)
  }
}

/// Map every weapon column of a sheet. Columns with a blank name are
/// skipped; a sheet with only the label column yields no weapons.
pub fn weapons_from_rows(rows: &[Vec<String>], category: &str) -> Result<Vec<Weapon>> {
  let width = rows.first().map_or(0, Vec::len);
  let mut weapons = Vec::with_capacity(width.saturating_sub(1));

  for column in 1..width {
    let weapon = map_column(rows, category, column)?;
    if weapon.name.is_empty() {
      tracing::debug!(category, column, "skipping unnamed column");
      continue;
    }
    weapons.push(weapon);
  }

  Ok(weapons)
}

// ─── Version marker ──────────────────────────────────────────────────────────

/// Reads the version sheet at a fixed URL.
#[derive(Clone)]
pub struct SheetMarkerSource<R> {
  reader: R,
  url:    String,
}

impl<R: TableReader> SheetMarkerSource<R> {
  pub fn new(reader: R, url: impl Into<String>) -> Self {
    Self { reader, url: url.into() }
  }
}

impl<R: TableReader> MarkerSource for SheetMarkerSource<R> {
  type Error = Error;

  async fn fetch_marker(&self) -> Result<VersionMarker> {
    let rows = self.reader.read(&self.url).await?;
    parse_marker(&rows)
  }
}

/// Extract the marker: the last whitespace-separated token of the first cell
/// of [`MARKER_ROW`].
pub fn parse_marker(rows: &[Vec<String>]) -> Result<VersionMarker> {
  rows
    .get(MARKER_ROW)
    .and_then(|row| row.first())
    .and_then(|cell| cell.split_whitespace().last())
    .map(VersionMarker::from)
    .ok_or(Error::MissingMarker { row: MARKER_ROW })
}
