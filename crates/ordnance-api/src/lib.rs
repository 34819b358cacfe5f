//! JSON REST API for Ordnance.
//!
//! Exposes an axum [`Router`] over any [`WeaponStore`] plus an [`Ingest`]
//! implementation for on-demand ingestion. Transport concerns (tracing,
//! request ids, TLS) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ordnance_api::api_router(state))
//! ```

pub mod error;
pub mod update;
pub mod version;
pub mod weapons;

use std::{future::Future, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use ordnance_core::{sources::SourceMap, store::WeaponStore};
use ordnance_ingest::Ingest;
use tokio_util::sync::CancellationToken;

pub use error::ApiError;

/// Default bound on a single query handler.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on a manually triggered ingestion.
pub const DEFAULT_INGEST_TIMEOUT: Duration = Duration::from_secs(120);

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S, I> {
  pub store:          Arc<S>,
  pub ingest:         Arc<I>,
  /// Known categories; queries for anything else are rejected.
  pub sources:        Arc<SourceMap>,
  /// Cancelled on shutdown; manual ingestions run under a child of it.
  pub shutdown:       CancellationToken,
  pub query_timeout:  Duration,
  pub ingest_timeout: Duration,
}

impl<S, I> ApiState<S, I> {
  pub fn new(
    store: Arc<S>,
    ingest: Arc<I>,
    sources: Arc<SourceMap>,
    shutdown: CancellationToken,
  ) -> Self {
    Self {
      store,
      ingest,
      sources,
      shutdown,
      query_timeout: DEFAULT_QUERY_TIMEOUT,
      ingest_timeout: DEFAULT_INGEST_TIMEOUT,
    }
  }

  pub fn with_timeouts(mut self, query: Duration, ingest: Duration) -> Self {
    self.query_timeout = query;
    self.ingest_timeout = ingest;
    self
  }

  /// Run a query handler body under the query timeout.
  pub(crate) async fn bounded<T>(
    &self,
    fut: impl Future<Output = Result<T, ApiError>>,
  ) -> Result<T, ApiError> {
    tokio::time::timeout(self.query_timeout, fut)
      .await
      .map_err(|_| ApiError::Timeout(self.query_timeout))?
  }
}

// Manual impl: `S` and `I` live behind `Arc`s and need not be `Clone`.
impl<S, I> Clone for ApiState<S, I> {
  fn clone(&self) -> Self {
    Self {
      store:          self.store.clone(),
      ingest:         self.ingest.clone(),
      sources:        self.sources.clone(),
      shutdown:       self.shutdown.clone(),
      query_timeout:  self.query_timeout,
      ingest_timeout: self.ingest_timeout,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, I>(state: ApiState<S, I>) -> Router<()>
where
  S: WeaponStore + 'static,
  I: Ingest + 'static,
{
  Router::new()
    // Queries
    .route("/weapons/{category}", get(weapons::by_category::<S, I>))
    .route("/weapons/search/{query}", get(weapons::search::<S, I>))
    .route("/version", get(version::current::<S, I>))
    // Ingestion
    .route("/update", post(update::trigger::<S, I>))
    .with_state(state)
}
