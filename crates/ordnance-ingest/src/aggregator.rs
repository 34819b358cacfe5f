//! Fan-out/fan-in fetching of every table in the source map.
//!
//! A dispatcher task feeds one job per source into a queue shared by a fixed
//! pool of workers. Workers push a typed outcome per job onto the results
//! channel, and the caller's task drains it. The first failure cancels the run
//! and discards everything gathered so far.

use std::sync::Arc;

use ordnance_core::{sources::SourceMap, upstream::TableParser, weapon::Weapon};
use tokio::{
  sync::{Mutex, mpsc},
  task::JoinSet,
};
use tokio_util::sync::CancellationToken;

use crate::{BoxError, IngestError, Result};

/// Default size of the worker pool.
pub const DEFAULT_WORKERS: usize = 5;

// ─── Messages ────────────────────────────────────────────────────────────────

/// Dispatcher → worker
struct Job {
  category: String,
  url:      String,
}

/// Worker → coordinator
enum Outcome {
  Parsed {
    category: String,
    weapons:  Vec<Weapon>,
  },
  Failed {
    category: String,
    url:      String,
    error:    BoxError,
  },
}

// ─── Aggregator ──────────────────────────────────────────────────────────────

/// Fetches every table of a [`SourceMap`] through a [`TableParser`] and
/// merges the results.
pub struct Aggregator<P> {
  sources: Arc<SourceMap>,
  parser:  Arc<P>,
  workers: usize,
}

impl<P> Aggregator<P> {
  /// `workers` is clamped to at least one.
  pub fn new(sources: Arc<SourceMap>, parser: Arc<P>, workers: usize) -> Self {
    Self { sources, parser, workers: workers.max(1) }
  }

  pub fn sources(&self) -> &SourceMap { &self.sources }
}

impl<P: TableParser + 'static> Aggregator<P> {
  /// Fetch and map every source, returning the union of their weapons with
  /// each record's category set to its source's category.
  ///
  /// Fails on the first source error, or when `ctx` is cancelled. No partial
  /// result is ever returned, and every spawned task has stopped by the time
  /// this returns.
  pub async fn aggregate(&self, ctx: &CancellationToken) -> Result<Vec<Weapon>> {
    if ctx.is_cancelled() {
      return Err(IngestError::Cancelled);
    }
    let total = self.sources.len();
    if total == 0 {
      return Ok(Vec::new());
    }

    let run = ctx.child_token();
    // Cancels the workers if this future is dropped mid-run.
    let _guard = run.clone().drop_guard();

    let (job_tx, job_rx) = mpsc::channel::<Job>(total);
    let (result_tx, mut result_rx) = mpsc::channel::<Outcome>(total);
    let job_rx = Arc::new(Mutex::new(job_rx));
    let mut tasks = JoinSet::new();

    // --- Dispatcher ---

    let jobs: Vec<Job> = self
      .sources
      .tables()
      .map(|(category, url)| Job { category: category.to_owned(), url: url.to_owned() })
      .collect();
    let dispatch_token = run.clone();
    tasks.spawn(async move {
      for job in jobs {
        tokio::select! {
          biased;
          _ = dispatch_token.cancelled() => return,
          sent = job_tx.send(job) => if sent.is_err() { return },
        }
      }
    });

    // --- Workers ---

    for id in 0..self.workers {
      tasks.spawn(worker(
        id,
        self.parser.clone(),
        job_rx.clone(),
        result_tx.clone(),
        run.clone(),
      ));
    }
    // Only worker clones hold senders now, so `recv` yields `None` once they
    // have all exited.
    drop(result_tx);

    // --- Fan-in ---

    let mut merged = Vec::new();
    let mut reported = 0;
    let outcome = loop {
      if reported == total {
        break Ok(std::mem::take(&mut merged));
      }
      tokio::select! {
        biased;
        _ = run.cancelled() => break Err(IngestError::Cancelled),
        next = result_rx.recv() => match next {
          Some(Outcome::Parsed { category, weapons }) => {
            reported += 1;
            tracing::debug!(%category, weapons = weapons.len(), reported, total, "table parsed");
            merged.extend(weapons);
          }
          Some(Outcome::Failed { category, url, error }) => {
            run.cancel();
            tracing::warn!(%category, %url, %error, "table failed, aborting run");
            break Err(IngestError::Source { category, url, source: error });
          }
          None => {
            break Err(IngestError::WorkerPool(format!(
              "workers exited after {reported} of {total} tables"
            )));
          }
        },
      }
    };

    run.cancel();
    tasks.shutdown().await;
    outcome
  }
}

/// Pull jobs until the queue is drained or the run is cancelled.
async fn worker<P: TableParser>(
  id: usize,
  parser: Arc<P>,
  jobs: Arc<Mutex<mpsc::Receiver<Job>>>,
  results: mpsc::Sender<Outcome>,
  token: CancellationToken,
) {
  loop {
    let job = tokio::select! {
      biased;
      _ = token.cancelled() => return,
      job = async { jobs.lock().await.recv().await } => job,
    };
    let Some(job) = job else {
      tracing::trace!(worker = id, "job queue drained");
      return;
    };

    let parsed = tokio::select! {
      biased;
      _ = token.cancelled() => return,
      parsed = parser.parse(&job.category, &job.url) => parsed,
    };

    let outcome = match parsed {
      Ok(mut weapons) => {
        for weapon in &mut weapons {
          weapon.category.clone_from(&job.category);
        }
        Outcome::Parsed { category: job.category, weapons }
      }
      Err(e) => Outcome::Failed {
        category: job.category,
        url:      job.url,
        error:    Box::new(e),
      },
    };

    tokio::select! {
      biased;
      _ = token.cancelled() => return,
      sent = results.send(outcome) => if sent.is_err() { return },
    }
  }
}
