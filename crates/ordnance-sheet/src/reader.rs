//! Raw sheet fetching: one URL in, a grid of cell strings out.

use std::{future::Future, time::Duration};

use reqwest::{Client, StatusCode, header};

use crate::{Error, Result};

/// A sheet as rows of cells. Rows may have different lengths.
pub type Rows = Vec<Vec<String>>;

const ACCEPT_CSV: &str = "text/csv, application/csv, text/plain";

/// Fetches one sheet and splits it into cells.
pub trait TableReader: Send + Sync {
  fn read<'a>(&'a self, url: &'a str) -> impl Future<Output = Result<Rows>> + Send + 'a;
}

/// [`TableReader`] over HTTP.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based, so the
/// table parser and the marker source can share one connection pool.
#[derive(Clone)]
pub struct HttpTableReader {
  client: Client,
}

impl HttpTableReader {
  /// `timeout` bounds each request end to end, body included.
  pub fn new(timeout: Duration) -> Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .pool_max_idle_per_host(15)
      .pool_idle_timeout(Duration::from_secs(90))
      .build()
      .map_err(Error::Client)?;
    Ok(Self { client })
  }
}

impl TableReader for HttpTableReader {
  async fn read(&self, url: &str) -> Result<Rows> {
    let transport = |source| Error::Transport { url: url.to_owned(), source };

    let resp = self
      .client
      .get(url)
      .header(header::ACCEPT, ACCEPT_CSV)
      .send()
      .await
      .map_err(transport)?;

    let status = resp.status();
    if status != StatusCode::OK {
      return Err(Error::Status { url: url.to_owned(), status: status.as_u16() });
    }

    let body = resp.bytes().await.map_err(transport)?;
    let rows = parse_csv(&body)?;
    tracing::trace!(url, rows = rows.len(), "sheet read");
    Ok(rows)
  }
}

/// Split CSV bytes into rows. No header handling; ragged rows are allowed.
pub fn parse_csv(bytes: &[u8]) -> Result<Rows> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .from_reader(bytes);

  reader
    .records()
    .map(|record| {
      record
        .map(|r| r.iter().map(str::to_owned).collect())
        .map_err(Error::from)
    })
    .collect()
}
