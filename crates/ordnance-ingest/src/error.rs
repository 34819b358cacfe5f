//! Error type for `ordnance-ingest`.

use std::time::Duration;

use thiserror::Error;

/// A type-erased backend error carried as the source of an [`IngestError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum IngestError {
  /// One table failed to fetch or map. Aborts the whole run.
  #[error("source {category} ({url}) failed: {source}")]
  Source {
    category: String,
    url:      String,
    #[source]
    source:   BoxError,
  },

  #[error("ingestion cancelled")]
  Cancelled,

  #[error("ingestion deadline of {0:?} exceeded")]
  DeadlineExceeded(Duration),

  #[error("store failure while trying to {phase}: {source}")]
  Store {
    phase:  &'static str,
    #[source]
    source: BoxError,
  },

  #[error("version marker fetch failed: {0}")]
  Marker(#[source] BoxError),

  /// The worker pool stopped before every source reported.
  #[error("worker pool failure: {0}")]
  WorkerPool(String),
}

impl IngestError {
  /// `true` for cancellation and deadline expiry, as opposed to failures of
  /// the sources or the store.
  pub fn is_cancellation(&self) -> bool {
    matches!(self, Self::Cancelled | Self::DeadlineExceeded(_))
  }

  pub(crate) fn store(
    phase: &'static str,
    source: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    Self::Store { phase, source: Box::new(source) }
  }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
