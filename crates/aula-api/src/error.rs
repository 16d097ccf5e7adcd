//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as the standard envelope
//! `{ "success": false, "error": "<message>" }`. Storage failures are
//! logged server-side in full and surfaced only as a generic message.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;

/// An error returned by an API handler.
#[derive(Debug)]
pub enum ApiError {
  /// Validation failure or uniqueness conflict → 400.
  BadRequest(String),
  /// Missing update/delete target → 404.
  NotFound(String),
  /// Unexpected failure → 500; the payload is the generic client
  /// message, the real cause has already been logged.
  Internal,
}

impl From<aula_core::Error> for ApiError {
  fn from(e: aula_core::Error) -> Self {
    match e {
      aula_core::Error::InvalidInput(m) | aula_core::Error::Conflict(m) => {
        ApiError::BadRequest(m)
      }
      aula_core::Error::NotFound(m) => ApiError::NotFound(m),
      aula_core::Error::Storage(m) => {
        tracing::error!(error = %m, "storage failure");
        ApiError::Internal
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Internal => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_owned(),
      ),
    };
    (status, Json(json!({ "success": false, "error": message })))
      .into_response()
  }
}
