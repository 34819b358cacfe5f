//! Error types for the sheet reader.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request to {url} failed: {source}")]
  Transport {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("unexpected status {status} from {url}")]
  Status { url: String, status: u16 },

  #[error("malformed CSV: {0}")]
  Csv(#[from] csv::Error),

  #[error("invalid data: {0}")]
  InvalidData(String),

  #[error("version marker not found in row {row}")]
  MissingMarker { row: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
