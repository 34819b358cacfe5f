//! Identity assignment and bulk upsert: one ingestion run end to end.

use std::{collections::HashSet, future::Future, sync::Arc, time::Instant};

use ordnance_core::{
  store::{UpsertCounts, WeaponStore},
  upstream::TableParser,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::Instrument as _;
use uuid::Uuid;

use crate::{Aggregator, IngestError, Result};

/// Summary of one successful ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
  pub run_id:     Uuid,
  /// Number of tables fetched.
  pub tables:     usize,
  /// Number of weapon records written.
  pub weapons:    usize,
  /// Number of distinct identities among them. A repeated identity
  /// overwrites the record before it, so this is what the store gains.
  pub distinct:   usize,
  pub counts:     UpsertCounts,
  pub elapsed_ms: u64,
}

/// Something that can run a full ingestion on demand.
///
/// Implemented by [`Ingestor`]; the observer and the HTTP trigger only see
/// this trait.
pub trait Ingest: Send + Sync {
  /// Fetch every table and upsert the union. The store is untouched unless
  /// every table succeeded.
  fn trigger_ingestion<'a>(
    &'a self,
    ctx: &'a CancellationToken,
  ) -> impl Future<Output = Result<IngestReport>> + Send + 'a;
}

/// Runs the [`Aggregator`] and writes its output to a [`WeaponStore`].
pub struct Ingestor<S, P> {
  store:      Arc<S>,
  aggregator: Aggregator<P>,
}

impl<S, P> Ingestor<S, P> {
  pub fn new(store: Arc<S>, aggregator: Aggregator<P>) -> Self {
    Self { store, aggregator }
  }
}

impl<S, P> Ingestor<S, P>
where
  S: WeaponStore,
  P: TableParser + 'static,
{
  async fn run(&self, run_id: Uuid, ctx: &CancellationToken) -> Result<IngestReport> {
    let started = Instant::now();
    let tables = self.aggregator.sources().len();
    tracing::info!(tables, "ingestion started");

    let mut weapons = self.aggregator.aggregate(ctx).await?;
    if ctx.is_cancelled() {
      return Err(IngestError::Cancelled);
    }

    let mut seen = HashSet::with_capacity(weapons.len());
    for weapon in &mut weapons {
      weapon.ensure_identity();
      if !seen.insert(weapon.identity.clone()) {
        tracing::debug!(
          identity = %weapon.identity,
          name = %weapon.name,
          category = %weapon.category,
          "identity repeated within run"
        );
      }
    }
    let total = weapons.len();
    let distinct = seen.len();

    let counts = self
      .store
      .upsert_weapons(weapons)
      .await
      .map_err(|e| IngestError::store("upsert weapons", e))?;

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::info!(
      tables,
      weapons = total,
      distinct,
      matched = counts.matched,
      modified = counts.modified,
      upserted = counts.upserted,
      elapsed_ms,
      "ingestion finished"
    );

    Ok(IngestReport { run_id, tables, weapons: total, distinct, counts, elapsed_ms })
  }
}

impl<S, P> Ingest for Ingestor<S, P>
where
  S: WeaponStore,
  P: TableParser + 'static,
{
  async fn trigger_ingestion<'a>(
    &'a self,
    ctx: &'a CancellationToken,
  ) -> Result<IngestReport> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("ingest", %run_id);
    self.run(run_id, ctx).instrument(span).await
  }
}
