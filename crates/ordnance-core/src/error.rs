//! Error types for `ordnance-core`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read source map {path:?}: {source}")]
  SourceMapRead {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to decode source map: {0}")]
  SourceMapDecode(#[from] serde_json::Error),

  #[error("source map has no tables")]
  NoTables,

  #[error("source map entry {0:?} has an empty category or url")]
  EmptySourceEntry(String),

  #[error("source map has no version url")]
  NoVersionUrl,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
