//! Handler for `POST /load-data`.
//!
//! Accepts a `multipart/form-data` body with the text file in the `file`
//! field, parses it with [`seis_core::parse::parse_readings`] and stores the
//! readings in one batch.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Multipart, State, multipart::MultipartRejection},
  http::StatusCode,
  response::IntoResponse,
};
use seis_core::{parse::parse_readings, store::ReadingStore};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadResponse {
  pub message:  String,
  /// Number of readings persisted.
  pub count:    usize,
  /// One line per skipped date token.
  pub warnings: Vec<String>,
}

/// `POST /load-data` — returns 201 + [`LoadResponse`].
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ReadingStore,
{
  let mut multipart =
    multipart.map_err(|_| ApiError::BadRequest("No file uploaded".into()))?;
  let text = read_file_field(&mut multipart)
    .await?
    .ok_or_else(|| ApiError::BadRequest("No file uploaded".into()))?;

  let parsed = parse_readings(&text);
  let warnings: Vec<String> =
    parsed.warnings.iter().map(ToString::to_string).collect();
  if !warnings.is_empty() {
    tracing::warn!(skipped = warnings.len(), "upload contained invalid date tokens");
  }

  let count = store
    .insert_readings(parsed.readings)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(count, "loaded readings");

  Ok((
    StatusCode::CREATED,
    Json(LoadResponse {
      message: "Data loaded successfully".into(),
      count,
      warnings,
    }),
  ))
}

/// Return the contents of the `file` field, decoded as UTF-8 with invalid
/// sequences replaced. Other fields are skipped.
async fn read_file_field(
  multipart: &mut Multipart,
) -> Result<Option<String>, ApiError> {
  while let Some(field) = multipart.next_field().await? {
    if field.name() == Some(FILE_FIELD) {
      let bytes = field.bytes().await?;
      return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()));
    }
  }
  Ok(None)
}
