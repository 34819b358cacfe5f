//! Handler for `POST /update`: run a full ingestion now.
//!
//! The stored version marker is left alone; only the observer advances it.

use axum::{Json, extract::State};
use ordnance_core::store::WeaponStore;
use ordnance_ingest::{Ingest, IngestError, IngestReport};

use crate::{ApiState, error::ApiError};

/// `POST /update`
pub async fn trigger<S, I>(
  State(state): State<ApiState<S, I>>,
) -> Result<Json<IngestReport>, ApiError>
where
  S: WeaponStore,
  I: Ingest,
{
  tracing::info!("manual ingestion requested");

  // Cancelled on shutdown, on deadline, or when the client goes away and this
  // future is dropped.
  let ctx = state.shutdown.child_token();
  let _guard = ctx.clone().drop_guard();

  let report = tokio::time::timeout(state.ingest_timeout, state.ingest.trigger_ingestion(&ctx))
    .await
    .map_err(|_| {
      ctx.cancel();
      IngestError::DeadlineExceeded(state.ingest_timeout)
    })??;
  Ok(Json(report))
}
