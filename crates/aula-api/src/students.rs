//! Handlers for `/api/students`.
//!
//! | Method   | Path                            | Notes |
//! |----------|---------------------------------|-------|
//! | `GET`    | `/api/students`                 | List all students |
//! | `POST`   | `/api/students`                 | Body: `{"cedula":..,"name":..}`; 201 |
//! | `PUT`    | `/api/students`                 | Full-field replacement by `cedula` |
//! | `DELETE` | `/api/students?cedula=<cedula>` | Key in the query string |

use axum::{
  Json,
  extract::{
    Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::HeaderMap,
  response::Response,
};
use serde::Deserialize;

use aula_core::{entity::NewStudent, store::RecordStore};
use aula_replica::Operation;

use crate::{AppState, envelope, error::ApiError, origin, to_row};

pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  Ok(envelope::ok(state.store.list_students().await?))
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Result<Json<NewStudent>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let student = state.store.create_student(input).await?;
  state
    .forwarder
    .replicate(origin(&headers), "students", Operation::Create(to_row(&student)))
    .await;
  Ok(envelope::created(student))
}

pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Result<Json<NewStudent>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let student = state.store.update_student(input).await?;
  state
    .forwarder
    .replicate(origin(&headers), "students", Operation::Update(to_row(&student)))
    .await;
  Ok(envelope::ok(student))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  pub cedula: String,
}

pub async fn remove<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  params: Result<Query<DeleteParams>, QueryRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  state.store.delete_student(&params.cedula).await?;
  state
    .forwarder
    .replicate(
      origin(&headers),
      "students",
      Operation::Delete { key: "cedula", value: params.cedula },
    )
    .await;
  Ok(envelope::deleted())
}
