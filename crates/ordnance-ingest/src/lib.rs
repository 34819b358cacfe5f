//! The ingestion pipeline: fan-out sheet fetching, identity assignment with
//! bulk upsert, and the periodic version-change observer.
//!
//! Everything here is generic over the [`ordnance_core`] traits. The server
//! wires in the HTTP sheet reader and the SQLite store; tests wire in
//! in-memory doubles.

#![allow(async_fn_in_trait)]

mod aggregator;
mod error;
mod ingestor;
mod observer;

pub use aggregator::{Aggregator, DEFAULT_WORKERS};
pub use error::{BoxError, IngestError, Result};
pub use ingestor::{Ingest, IngestReport, Ingestor};
pub use observer::{
  CycleOutcome, DEFAULT_CYCLE_TIMEOUT, DEFAULT_POLL_INTERVAL, VersionObserver,
};

#[cfg(test)]
mod testing;
