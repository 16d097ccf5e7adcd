//! Replication forwarder: re-issues successful local mutations against
//! one configured peer instance.
//!
//! Loop prevention is a sentinel `User-Agent`: outbound calls are tagged
//! with [`REPLICA_AGENT`], and an inbound mutation carrying that tag is
//! never forwarded again. Propagation depth is therefore exactly one
//! hop. This guard only holds for a two-node topology; a ring of three
//! or more nodes would need an origin identifier or hop counter
//! instead.
//!
//! Forwarding is best-effort: timeouts, connection errors and non-2xx
//! peer responses are logged and swallowed. The local mutation has
//! already committed by the time the forwarder runs, and its outcome is
//! never affected.

use std::time::Duration;

use reqwest::{Client, header::USER_AGENT};
use serde_json::Value;

/// Sentinel `User-Agent` value marking a request as peer-originated.
pub const REPLICA_AGENT: &str = "middleware";

/// True if the inbound request was issued by a peer's forwarder and
/// must therefore not be forwarded again.
pub fn is_replica_origin(agent: Option<&str>) -> bool {
  agent == Some(REPLICA_AGENT)
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// A successful local mutation, ready to be re-issued against the peer.
#[derive(Debug)]
pub enum Operation {
  /// `POST` the stored row to the peer.
  Create(Value),
  /// `PUT` the updated row to the peer.
  Update(Value),
  /// `DELETE <peer>/api/<entity>?<key>=<value>` — the key travels in
  /// the query string so the peer's own delete handler can consume it.
  Delete {
    key:   &'static str,
    value: String,
  },
}

// ─── Forwarder ───────────────────────────────────────────────────────────────

/// Re-issues mutations against one peer base URL.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. With
/// no peer configured every call is a no-op.
#[derive(Clone)]
pub struct Forwarder {
  client: Client,
  peer:   Option<String>,
}

impl Forwarder {
  /// Build a forwarder. `peer_url` is the peer's base URL (e.g.
  /// `http://localhost:3001`); `None` disables replication. `timeout`
  /// bounds every outbound call so a slow peer cannot stall request
  /// handling indefinitely.
  pub fn new(
    peer_url: Option<String>,
    timeout: Duration,
  ) -> Result<Self, reqwest::Error> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, peer: peer_url })
  }

  pub fn is_enabled(&self) -> bool {
    self.peer.is_some()
  }

  /// Best-effort replication of a successful mutation on `entity`.
  ///
  /// `origin` is the inbound request's `User-Agent`. If it equals the
  /// sentinel the call is a no-op (loop termination). All failures are
  /// logged and swallowed; this never returns an error.
  pub async fn replicate(
    &self,
    origin: Option<&str>,
    entity: &'static str,
    op: Operation,
  ) {
    if is_replica_origin(origin) {
      tracing::debug!(entity, "mutation originated from peer; not forwarding");
      return;
    }
    let Some(peer) = &self.peer else {
      return;
    };

    let url = format!("{}/api/{entity}", peer.trim_end_matches('/'));
    let request = match op {
      Operation::Create(row) => self
        .client
        .post(&url)
        .json(&with_origin(row, origin)),
      Operation::Update(row) => self
        .client
        .put(&url)
        .json(&with_origin(row, origin)),
      Operation::Delete { key, value } => {
        self.client.delete(&url).query(&[(key, value)])
      }
    };

    match request.header(USER_AGENT, REPLICA_AGENT).send().await {
      Ok(resp) if resp.status().is_success() => {
        tracing::info!(entity, url, "replicated mutation to peer");
      }
      Ok(resp) => {
        tracing::warn!(
          entity,
          url,
          status = %resp.status(),
          "peer rejected replicated mutation"
        );
      }
      Err(e) => {
        tracing::warn!(entity, url, error = %e, "failed to reach peer");
      }
    }
  }
}

/// Attach the inbound originator marker to the outbound payload.
fn with_origin(mut row: Value, origin: Option<&str>) -> Value {
  if let Value::Object(map) = &mut row {
    map.insert(
      "origin".to_owned(),
      Value::String(origin.unwrap_or_default().to_owned()),
    );
  }
  row
}

// ─── Tests ───────────────────────────────────────────────────────────────────
