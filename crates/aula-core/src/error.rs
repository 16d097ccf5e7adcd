//! Error types for `aula-core`.
//!
//! The taxonomy maps one-to-one onto HTTP statuses in `aula-api`:
//! `InvalidInput` and `Conflict` become 400, `NotFound` 404, and
//! `Storage` 500 (logged in full, surfaced as a generic message).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is missing, malformed, or references a row that
  /// does not exist.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// The write would violate a uniqueness invariant, or a delete target
  /// is still referenced by a child row.
  #[error("conflict: {0}")]
  Conflict(String),

  /// The key named by an update or delete does not exist.
  #[error("not found: {0}")]
  NotFound(String),

  /// Storage engine failure. Never caused by caller input.
  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
