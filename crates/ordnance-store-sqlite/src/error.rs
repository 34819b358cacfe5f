//! Error type for `ordnance-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A record reached the store without an identity.
  #[error("weapon {name:?} in {category:?} has no identity")]
  MissingIdentity { name: String, category: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
