//! Success-side response envelope: `{ "success": true, "data": ... }`.

use axum::{Json, http::StatusCode, response::Response};
use serde::Serialize;
use serde_json::json;

use axum::response::IntoResponse as _;

/// `200 OK` with a data payload.
pub fn ok(data: impl Serialize) -> Response {
  (StatusCode::OK, Json(json!({ "success": true, "data": data })))
    .into_response()
}

/// `201 Created` with the stored row.
pub fn created(data: impl Serialize) -> Response {
  (StatusCode::CREATED, Json(json!({ "success": true, "data": data })))
    .into_response()
}

/// `200 OK` with no payload — used by delete.
pub fn deleted() -> Response {
  (StatusCode::OK, Json(json!({ "success": true }))).into_response()
}
