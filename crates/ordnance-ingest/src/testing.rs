//! In-memory doubles for the upstream and store traits.

use std::{
  collections::HashMap,
  sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
  time::Duration,
};

use tokio::time::Instant;

use chrono::Utc;
use ordnance_core::{
  sources::SourceMap,
  store::{UpsertCounts, WeaponStore},
  upstream::{MarkerSource, TableParser},
  version::{VersionMarker, VersionRecord},
  weapon::{SearchResult, Weapon},
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{Ingest, IngestError, IngestReport, Result};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Boom(pub String);

pub fn weapon(name: &str) -> Weapon {
  Weapon { name: name.to_string(), ..Weapon::default() }
}

pub fn source_map(categories: &[&str]) -> Arc<SourceMap> {
  let tables = categories
    .iter()
    .map(|c| (c.to_string(), format!("https://sheets.test/{c}.csv")));
  Arc::new(SourceMap::new("https://sheets.test/version.csv", tables).unwrap())
}

// ─── Parser ──────────────────────────────────────────────────────────────────

pub enum Script {
  Weapons(Vec<Weapon>),
  Fail(&'static str),
  /// Never completes.
  Hang,
  /// Completes after a (paused-clock) delay.
  Slow(Duration, Vec<Weapon>),
}

/// Returns a canned result per category.
#[derive(Default)]
pub struct ScriptedParser {
  scripts: HashMap<String, Script>,
  calls:   AtomicUsize,
}

impl ScriptedParser {
  pub fn with(mut self, category: &str, script: Script) -> Self {
    self.scripts.insert(category.to_string(), script);
    self
  }

  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl TableParser for ScriptedParser {
  type Error = Boom;

  async fn parse<'a>(
    &'a self,
    category: &'a str,
    _url: &'a str,
  ) -> Result<Vec<Weapon>, Boom> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    match self.scripts.get(category) {
      Some(Script::Weapons(w)) => Ok(w.clone()),
      Some(Script::Fail(msg)) => Err(Boom(msg.to_string())),
      Some(Script::Hang) => std::future::pending().await,
      Some(Script::Slow(delay, w)) => {
        tokio::time::sleep(*delay).await;
        Ok(w.clone())
      }
      None => Ok(vec![]),
    }
  }
}

// ─── Marker ──────────────────────────────────────────────────────────────────

/// Serves a settable marker, or fails when none is set.
#[derive(Default)]
pub struct FixedMarker(Mutex<Option<String>>);

impl FixedMarker {
  pub fn new(marker: &str) -> Self { Self(Mutex::new(Some(marker.to_string()))) }

  pub fn failing() -> Self { Self(Mutex::new(None)) }

  pub fn set(&self, marker: &str) {
    *self.0.lock().unwrap() = Some(marker.to_string());
  }
}

impl MarkerSource for FixedMarker {
  type Error = Boom;

  async fn fetch_marker(&self) -> Result<VersionMarker, Boom> {
    self
      .0
      .lock()
      .unwrap()
      .as_deref()
      .map(VersionMarker::from)
      .ok_or_else(|| Boom("version sheet unavailable".into()))
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
  weapons:     Mutex<HashMap<String, Weapon>>,
  version:     Mutex<Option<VersionRecord>>,
  fail_upsert: AtomicBool,
  fail_read:   AtomicBool,
}

impl MemoryStore {
  pub fn with_version(marker: &str) -> Self {
    let store = Self::default();
    *store.version.lock().unwrap() = Some(VersionRecord {
      version:     VersionMarker::from(marker),
      recorded_at: Utc::now(),
    });
    store
  }

  pub fn fail_upserts(&self) { self.fail_upsert.store(true, Ordering::SeqCst); }

  pub fn fail_reads(&self) { self.fail_read.store(true, Ordering::SeqCst); }

  pub fn version(&self) -> Option<String> {
    self
      .version
      .lock()
      .unwrap()
      .as_ref()
      .map(|r| r.version.to_string())
  }

  pub fn weapons(&self) -> Vec<Weapon> {
    self.weapons.lock().unwrap().values().cloned().collect()
  }
}

impl WeaponStore for MemoryStore {
  type Error = Boom;

  async fn upsert_weapons(&self, weapons: Vec<Weapon>) -> Result<UpsertCounts, Boom> {
    if self.fail_upsert.load(Ordering::SeqCst) {
      return Err(Boom("disk full".into()));
    }
    let mut stored = self.weapons.lock().unwrap();
    let mut counts = UpsertCounts::default();
    for w in weapons {
      match stored.insert(w.identity.clone(), w.clone()) {
        None => counts.upserted += 1,
        Some(old) => {
          counts.matched += 1;
          if old != w {
            counts.modified += 1;
          }
        }
      }
    }
    Ok(counts)
  }

  async fn write_version(&self, version: VersionMarker) -> Result<VersionRecord, Boom> {
    let record = VersionRecord { version, recorded_at: Utc::now() };
    *self.version.lock().unwrap() = Some(record.clone());
    Ok(record)
  }

  async fn weapons_by_category<'a>(
    &'a self,
    category: &'a str,
  ) -> Result<Vec<Weapon>, Boom> {
    Ok(
      self
        .weapons()
        .into_iter()
        .filter(|w| w.category == category)
        .collect(),
    )
  }

  async fn search_by_name<'a>(
    &'a self,
    query: &'a str,
  ) -> Result<Vec<SearchResult>, Boom> {
    let query = query.to_lowercase();
    Ok(
      self
        .weapons()
        .into_iter()
        .filter(|w| w.name.to_lowercase().contains(&query))
        .map(|w| SearchResult { name: w.name, category: w.category })
        .collect(),
    )
  }

  async fn current_version(&self) -> Result<Option<VersionRecord>, Boom> {
    if self.fail_read.load(Ordering::SeqCst) {
      return Err(Boom("database is locked".into()));
    }
    Ok(self.version.lock().unwrap().clone())
  }
}

// ─── Ingest ──────────────────────────────────────────────────────────────────

/// Counts triggers; optionally fails every run.
#[derive(Default)]
pub struct CountingIngest {
  runs: AtomicUsize,
  fail: bool,
}

impl CountingIngest {
  pub fn failing() -> Self { Self { fail: true, ..Self::default() } }

  pub fn runs(&self) -> usize { self.runs.load(Ordering::SeqCst) }
}

impl Ingest for CountingIngest {
  async fn trigger_ingestion<'a>(
    &'a self,
    _ctx: &'a CancellationToken,
  ) -> Result<IngestReport> {
    self.runs.fetch_add(1, Ordering::SeqCst);
    if self.fail {
      return Err(IngestError::Source {
        category: "aam-ir".into(),
        url:      "https://sheets.test/aam-ir.csv".into(),
        source:   Box::new(Boom("HTTP 500".into())),
      });
    }
    Ok(IngestReport {
      run_id:     Uuid::new_v4(),
      tables:     0,
      weapons:    0,
      distinct:   0,
      counts:     UpsertCounts::default(),
      elapsed_ms: 0,
    })
  }
}

/// Sleeps through its first run, then fails every run at once, so the marker
/// never advances and each tick ingests again. Records when runs start and
/// how many overlap.
pub struct SlowIngest {
  delay:         Duration,
  origin:        Instant,
  starts:        Mutex<Vec<Duration>>,
  in_flight:     AtomicUsize,
  max_in_flight: AtomicUsize,
}

impl SlowIngest {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      origin:        Instant::now(),
      starts:        Mutex::new(Vec::new()),
      in_flight:     AtomicUsize::new(0),
      max_in_flight: AtomicUsize::new(0),
    }
  }

  /// Offsets from construction at which each run started.
  pub fn starts(&self) -> Vec<Duration> { self.starts.lock().unwrap().clone() }

  pub fn max_in_flight(&self) -> usize { self.max_in_flight.load(Ordering::SeqCst) }
}

impl Ingest for SlowIngest {
  async fn trigger_ingestion<'a>(
    &'a self,
    ctx: &'a CancellationToken,
  ) -> Result<IngestReport> {
    let first = {
      let mut starts = self.starts.lock().unwrap();
      starts.push(self.origin.elapsed());
      starts.len() == 1
    };
    let delay = if first { self.delay } else { Duration::ZERO };
    let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_in_flight.fetch_max(now, Ordering::SeqCst);

    let cancelled = tokio::select! {
      _ = ctx.cancelled() => true,
      _ = tokio::time::sleep(delay) => false,
    };
    self.in_flight.fetch_sub(1, Ordering::SeqCst);

    if cancelled {
      return Err(IngestError::Cancelled);
    }
    Err(IngestError::Source {
      category: "aam-ir".into(),
      url:      "https://sheets.test/aam-ir.csv".into(),
      source:   Box::new(Boom("HTTP 503".into())),
    })
  }
}
