//! Traits for the upstream side of ingestion: sheet parsing and the version
//! marker feed.
//!
//! Implemented by `ordnance-sheet` over HTTP, and by scripted doubles in
//! tests.

use std::future::Future;

use crate::{version::VersionMarker, weapon::Weapon};

/// Turns one (category, URL) pair into that table's weapons.
pub trait TableParser: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch and map one sheet. An empty sheet yields an empty list.
  fn parse<'a>(
    &'a self,
    category: &'a str,
    url: &'a str,
  ) -> impl Future<Output = Result<Vec<Weapon>, Self::Error>> + Send + 'a;
}

/// Produces the upstream's current version marker.
pub trait MarkerSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch_marker(
    &self,
  ) -> impl Future<Output = Result<VersionMarker, Self::Error>> + Send + '_;
}
