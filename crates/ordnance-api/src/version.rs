//! Handler for `GET /version`.

use axum::{Json, extract::State};
use ordnance_core::{store::WeaponStore, version::VersionRecord};
use ordnance_ingest::Ingest;

use crate::{ApiState, error::ApiError};

/// `GET /version`: the stored marker and when it was accepted. 404 until the
/// first successful observer-driven ingestion.
pub async fn current<S, I>(
  State(state): State<ApiState<S, I>>,
) -> Result<Json<VersionRecord>, ApiError>
where
  S: WeaponStore,
  I: Ingest,
{
  let record = state
    .bounded(async {
      state
        .store
        .current_version()
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))
    })
    .await?
    .ok_or_else(|| ApiError::NotFound("no version has been ingested yet".into()))?;
  Ok(Json(record))
}
