//! Handlers for `/api/teacher_cycles` — teacher-to-subject assignments
//! per academic cycle.
//!
//! The list endpoint is join-expanded: it returns teacher and subject
//! names instead of raw keys. Create and update enforce the
//! `(teacher, subject, cycle)` uniqueness invariant via the store.

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

use aula_core::{entity::NewTeacherCycle, store::RecordStore};
use aula_replica::Operation;

use crate::{AppState, envelope, error::ApiError, origin, to_row};

pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  Ok(envelope::ok(state.store.list_teacher_cycles().await?))
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Result<Json<NewTeacherCycle>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let assignment = state.store.create_teacher_cycle(input).await?;
  state
    .forwarder
    .replicate(
      origin(&headers),
      "teacher_cycles",
      Operation::Create(to_row(&assignment)),
    )
    .await;
  Ok(envelope::created(assignment))
}

pub async fn update<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  body: Result<Json<NewTeacherCycle>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let assignment = state.store.update_teacher_cycle(input).await?;
  state
    .forwarder
    .replicate(
      origin(&headers),
      "teacher_cycles",
      Operation::Update(to_row(&assignment)),
    )
    .await;
  Ok(envelope::ok(assignment))
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
  pub id: String,
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
  state.store.delete_teacher_cycle(&params.id).await?;
  state
    .forwarder
    .replicate(
      origin(&headers),
      "teacher_cycles",
      Operation::Delete { key: "id", value: params.id },
    )
    .await;
  Ok(envelope::deleted())
}
