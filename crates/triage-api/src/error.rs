//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use triage_core::provider::TransportError;

/// An error returned by an API handler. Every variant renders as
/// `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Unknown path")]
  UnknownPath,

  #[error("{0}")]
  BadRequest(String),

  #[error("provider error: {0}")]
  Provider(#[from] TransportError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<triage_core::Error> for ApiError {
  fn from(e: triage_core::Error) -> Self {
    match e {
      triage_core::Error::EmptyTicket => ApiError::BadRequest(e.to_string()),
      triage_core::Error::Provider(e) => ApiError::Provider(e),
      triage_core::Error::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::UnknownPath => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
