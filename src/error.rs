//! Error types surfaced at the HTTP boundary, plus conversions from the lower layers.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::scoring::ScoringError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
  error: &'static str,
  message: String,
}

impl ApiError {
  fn kind(&self) -> (StatusCode, &'static str) {
    match self {
      ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
      ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
      ApiError::Conflict(_) => (StatusCode::CONFLICT, "concurrency_conflict"),
      ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, error) = self.kind();
    (status, Json(ErrorBody { error, message: self.to_string() })).into_response()
  }
}

impl From<ScoringError> for ApiError {
  fn from(e: ScoringError) -> Self {
    match e {
      ScoringError::EmptyQuest(_) => ApiError::Internal(e.to_string()),
      ScoringError::UnknownQuestion(_) | ScoringError::DuplicateAnswer(_) => ApiError::Validation(e.to_string()),
    }
  }
}

impl From<StoreError> for ApiError {
  fn from(e: StoreError) -> Self {
    match e {
      StoreError::StudentNotFound(_) => ApiError::NotFound(e.to_string()),
      StoreError::Conflict { .. } => ApiError::Conflict(e.to_string()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_codes_follow_error_kind() {
    assert_eq!(ApiError::NotFound("x".into()).into_response().status(), StatusCode::NOT_FOUND);
    assert_eq!(ApiError::Validation("x".into()).into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(ApiError::Conflict("x".into()).into_response().status(), StatusCode::CONFLICT);
  }

  #[test]
  fn scoring_errors_map_to_validation_or_internal() {
    let e: ApiError = ScoringError::UnknownQuestion("q9".into()).into();
    assert!(matches!(e, ApiError::Validation(_)));
    let e: ApiError = ScoringError::EmptyQuest("empty".into()).into();
    assert!(matches!(e, ApiError::Internal(_)));
  }
}
