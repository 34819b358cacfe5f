//! HTTP serving glue for the Ordnance binary: configuration and the outer
//! router with tracing and request-id layers.

use std::{path::PathBuf, time::Duration};

use axum::{
  Router,
  body::Body,
  http::{HeaderName, Request},
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{
  request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
  trace::TraceLayer,
};

/// Header carrying the per-request id, generated when the client sends none.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` layered with
/// `ORDNANCE_*` environment variables. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  /// SQLite database file; a leading `~/` is expanded.
  pub store_path:           PathBuf,
  /// JSON source map; a leading `~/` is expanded.
  pub sources_path:         PathBuf,
  /// Aggregator worker-pool size.
  pub workers:              usize,
  pub fetch_timeout_secs:   u64,
  pub cycle_timeout_secs:   u64,
  pub poll_interval_secs:   u64,
  pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "127.0.0.1".to_string(),
      port:                 8080,
      store_path:           PathBuf::from("ordnance.db"),
      sources_path:         PathBuf::from("sources.json"),
      workers:              ordnance_ingest::DEFAULT_WORKERS,
      fetch_timeout_secs:   10,
      cycle_timeout_secs:   ordnance_ingest::DEFAULT_CYCLE_TIMEOUT.as_secs(),
      poll_interval_secs:   ordnance_ingest::DEFAULT_POLL_INTERVAL.as_secs(),
      request_timeout_secs: 5,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn fetch_timeout(&self) -> Duration { Duration::from_secs(self.fetch_timeout_secs) }

  pub fn cycle_timeout(&self) -> Duration { Duration::from_secs(self.cycle_timeout_secs) }

  /// Observer period, never shorter than one second.
  pub fn poll_interval(&self) -> Duration {
    Duration::from_secs(self.poll_interval_secs.max(1))
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Mount `api` under `/api` and wrap it in request-id and tracing layers.
///
/// The request id is set before the trace span is made, so every log line of
/// a request carries it, and it is echoed on the response.
pub fn app(api: Router) -> Router {
  let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

  Router::new().nest("/api", api).layer(
    ServiceBuilder::new()
      .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
      .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let request_id = req
          .headers()
          .get(REQUEST_ID_HEADER)
          .and_then(|v| v.to_str().ok())
          .unwrap_or("-");
        tracing::info_span!(
          "request",
          method = %req.method(),
          uri = %req.uri(),
          request_id,
        )
      }))
      .layer(PropagateRequestIdLayer::new(request_id)),
  )
}

#[cfg(test)]
mod tests {
  use axum::{http::StatusCode, routing::get};
  use tower::ServiceExt as _;

  use super::*;

  fn ping_app() -> Router {
    app(Router::new().route("/ping", get(|| async { "pong" })))
  }

  #[test]
  fn empty_config_uses_defaults() {
    let cfg: ServerConfig = config::Config::builder()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.workers, 5);
    assert_eq!(cfg.poll_interval(), Duration::from_secs(1800));
    assert_eq!(cfg.fetch_timeout(), Duration::from_secs(10));
    assert_eq!(cfg.store_path, PathBuf::from("ordnance.db"));
  }

  #[test]
  fn toml_overrides_selected_fields() {
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(
        "port = 9000\nworkers = 2\nsources_path = \"/etc/ordnance/sources.json\"",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.workers, 2);
    assert_eq!(cfg.sources_path, PathBuf::from("/etc/ordnance/sources.json"));
    assert_eq!(cfg.host, "127.0.0.1");
  }

  #[tokio::test]
  async fn generates_request_id_when_absent() {
    let req = Request::builder().uri("/api/ping").body(Body::empty()).unwrap();
    let resp = ping_app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let id = resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
    assert_eq!(id.len(), 36);
  }

  #[tokio::test]
  async fn echoes_client_request_id() {
    let req = Request::builder()
      .uri("/api/ping")
      .header(REQUEST_ID_HEADER, "abc-123")
      .body(Body::empty())
      .unwrap();
    let resp = ping_app().oneshot(req).await.unwrap();

    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");
  }

  #[tokio::test]
  async fn routes_outside_api_are_404() {
    let req = Request::builder().uri("/ping").body(Body::empty()).unwrap();
    let resp = ping_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
