//! The `WeaponStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `ordnance-store-sqlite`).
//! The ingestion pipeline and the HTTP API depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  version::{VersionMarker, VersionRecord},
  weapon::{SearchResult, Weapon},
};

/// Diagnostic counts from a bulk upsert. Never used for control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertCounts {
  /// Records whose identity already existed.
  pub matched:  u64,
  /// Existing records whose stored content changed.
  pub modified: u64,
  /// Records inserted under a new identity.
  pub upserted: u64,
}

/// Abstraction over a weapon store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait WeaponStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert-or-replace every record by identity.
  ///
  /// Each record is written atomically on its own; there is no transaction
  /// spanning the batch. Every record must already carry an identity.
  fn upsert_weapons(
    &self,
    weapons: Vec<Weapon>,
  ) -> impl Future<Output = Result<UpsertCounts, Self::Error>> + Send + '_;

  /// Overwrite the current version marker.
  fn write_version(
    &self,
    version: VersionMarker,
  ) -> impl Future<Output = Result<VersionRecord, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All records of one category. Empty if the category was never ingested.
  fn weapons_by_category<'a>(
    &'a self,
    category: &'a str,
  ) -> impl Future<Output = Result<Vec<Weapon>, Self::Error>> + Send + 'a;

  /// Case-insensitive substring match on the weapon name. Wildcard
  /// characters in `query` match literally.
  fn search_by_name<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<SearchResult>, Self::Error>> + Send + 'a;

  /// The current version marker, or `None` if nothing was ever ingested.
  fn current_version(
    &self,
  ) -> impl Future<Output = Result<Option<VersionRecord>, Self::Error>> + Send + '_;
}
