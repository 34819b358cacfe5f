//! The version-change observer.
//!
//! Polls the upstream version marker on a fixed period and runs a full
//! ingestion whenever it differs from the stored one. The stored marker only
//! advances after a successful ingestion, so a failed run is retried on the
//! next tick.

use std::{sync::Arc, time::Duration};

use ordnance_core::{store::WeaponStore, upstream::MarkerSource, version::VersionMarker};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::Instrument as _;

use crate::{Ingest, IngestError, IngestReport, Result};

/// Default polling period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Default deadline for one check, covering the marker fetch and any
/// ingestion it triggers.
pub const DEFAULT_CYCLE_TIMEOUT: Duration = Duration::from_secs(120);

/// What one check did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
  /// Upstream still reports the stored marker.
  Unchanged(VersionMarker),
  /// A new marker was ingested and stored.
  Updated {
    previous: Option<VersionMarker>,
    current:  VersionMarker,
    report:   IngestReport,
  },
}

pub struct VersionObserver<S, I, M> {
  store:         Arc<S>,
  ingest:        Arc<I>,
  marker:        Arc<M>,
  period:        Duration,
  cycle_timeout: Duration,
}

impl<S, I, M> VersionObserver<S, I, M>
where
  S: WeaponStore,
  I: Ingest,
  M: MarkerSource,
{
  pub fn new(store: Arc<S>, ingest: Arc<I>, marker: Arc<M>) -> Self {
    Self {
      store,
      ingest,
      marker,
      period: DEFAULT_POLL_INTERVAL,
      cycle_timeout: DEFAULT_CYCLE_TIMEOUT,
    }
  }

  pub fn with_period(mut self, period: Duration) -> Self {
    self.period = period;
    self
  }

  pub fn with_cycle_timeout(mut self, timeout: Duration) -> Self {
    self.cycle_timeout = timeout;
    self
  }

  /// Run until `token` is cancelled.
  ///
  /// Checks once immediately when no marker is stored, then once per period.
  /// Checks never overlap: a check that overruns the period swallows the
  /// ticks it missed.
  pub async fn run(self, token: CancellationToken) {
    tracing::info!(period_secs = self.period.as_secs(), "version observer started");

    match self.store.current_version().await {
      Ok(None) => {
        tracing::info!("no stored version marker, bootstrapping");
        self.run_cycle(&token).await;
      }
      Ok(Some(record)) => {
        tracing::info!(version = %record.version, "resuming from stored version marker");
      }
      Err(e) => tracing::warn!(error = %e, "could not read stored version marker"),
    }

    let mut ticker = tokio::time::interval(self.period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
      tokio::select! {
        biased;
        _ = token.cancelled() => break,
        _ = ticker.tick() => self.run_cycle(&token).await,
      }
    }
    tracing::info!("version observer stopped");
  }

  async fn run_cycle(&self, token: &CancellationToken) {
    let span = tracing::info_span!("version_check");
    match self.check_version_change(token).instrument(span.clone()).await {
      Ok(CycleOutcome::Unchanged(_)) => {}
      Ok(CycleOutcome::Updated { current, report, .. }) => {
        span.in_scope(|| {
          tracing::info!(version = %current, run_id = %report.run_id, "version marker advanced");
        });
      }
      Err(e) if e.is_cancellation() && token.is_cancelled() => {
        span.in_scope(|| tracing::debug!("check interrupted by shutdown"));
      }
      Err(e) => span.in_scope(|| tracing::error!(error = %e, "version check failed")),
    }
  }

  /// One bounded check: compare the stored and upstream markers, and ingest
  /// when they differ or nothing is stored.
  pub async fn check_version_change(&self, token: &CancellationToken) -> Result<CycleOutcome> {
    let cycle = token.child_token();
    let _guard = cycle.clone().drop_guard();

    match tokio::time::timeout(self.cycle_timeout, self.compare_and_ingest(&cycle)).await {
      Ok(outcome) => outcome,
      Err(_) => {
        cycle.cancel();
        Err(IngestError::DeadlineExceeded(self.cycle_timeout))
      }
    }
  }

  async fn compare_and_ingest(&self, cycle: &CancellationToken) -> Result<CycleOutcome> {
    if cycle.is_cancelled() {
      return Err(IngestError::Cancelled);
    }

    let (stored, candidate) = tokio::select! {
      biased;
      _ = cycle.cancelled() => return Err(IngestError::Cancelled),
      pair = async { tokio::join!(self.store.current_version(), self.marker.fetch_marker()) } => pair,
    };
    let stored = stored.map_err(|e| IngestError::store("read version marker", e))?;
    let candidate = candidate.map_err(|e| IngestError::Marker(Box::new(e)))?;

    let previous = stored.map(|record| record.version);
    if previous.as_ref() == Some(&candidate) {
      tracing::info!(version = %candidate, "nothing to update");
      return Ok(CycleOutcome::Unchanged(candidate));
    }

    tracing::info!(
      previous = previous.as_ref().map_or("none", VersionMarker::as_str),
      current = %candidate,
      "version changed, ingesting"
    );
    let report = self.ingest.trigger_ingestion(cycle).await?;

    self
      .store
      .write_version(candidate.clone())
      .await
      .map_err(|e| IngestError::store("write version marker", e))?;

    Ok(CycleOutcome::Updated { previous, current: candidate, report })
  }
}
