//! JSON REST API for Aula.
//!
//! Exposes an axum [`Router`] backed by any
//! [`aula_core::store::RecordStore`], plus the [`ServerConfig`] consumed
//! by the server binary. Five parallel resource collections live under
//! `/api`; every mutation that succeeds locally is handed to the
//! [`aula_replica::Forwarder`] together with the inbound `User-Agent`,
//! which decides whether to replicate it to the peer.

pub mod enrollments;
pub mod envelope;
pub mod error;
pub mod students;
pub mod subjects;
pub mod teacher_cycles;
pub mod teachers;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderMap, header},
  routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use aula_core::store::RecordStore;
use aula_replica::Forwarder;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String {
  "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
  3000
}

fn default_db_path() -> PathBuf {
  PathBuf::from("db/aula.sqlite")
}

fn default_forward_timeout() -> u64 {
  10
}

/// Runtime server configuration, deserialised from `config.toml` with
/// an `AULA_`-prefixed environment overlay.
///
/// `peer_url` unset disables replication entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
  #[serde(default = "default_db_path")]
  pub db_path: PathBuf,
  #[serde(default)]
  pub peer_url: Option<String>,
  #[serde(default = "default_forward_timeout")]
  pub forward_timeout_secs: u64,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:     Arc<S>,
  pub forwarder: Arc<Forwarder>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/api/subjects",
      get(subjects::list::<S>)
        .post(subjects::create::<S>)
        .put(subjects::update::<S>)
        .delete(subjects::remove::<S>),
    )
    .route(
      "/api/students",
      get(students::list::<S>)
        .post(students::create::<S>)
        .put(students::update::<S>)
        .delete(students::remove::<S>),
    )
    .route(
      "/api/teachers",
      get(teachers::list::<S>)
        .post(teachers::create::<S>)
        .put(teachers::update::<S>)
        .delete(teachers::remove::<S>),
    )
    .route(
      "/api/teacher_cycles",
      get(teacher_cycles::list::<S>)
        .post(teacher_cycles::create::<S>)
        .put(teacher_cycles::update::<S>)
        .delete(teacher_cycles::remove::<S>),
    )
    .route(
      "/api/enrollments",
      get(enrollments::list::<S>)
        .post(enrollments::create::<S>)
        .put(enrollments::update::<S>)
        .delete(enrollments::remove::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Handler helpers ─────────────────────────────────────────────────────────

/// The inbound originator marker, as carried in `User-Agent`.
pub(crate) fn origin(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::USER_AGENT)
    .and_then(|v| v.to_str().ok())
}

/// Serialise a stored row into the replication payload.
pub(crate) fn to_row(row: &impl Serialize) -> serde_json::Value {
  serde_json::to_value(row).unwrap_or(serde_json::Value::Null)
}

// ─── Integration tests ────────────────────────────────────────────────────────
