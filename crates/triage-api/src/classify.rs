//! Handler for `POST /classify`.
//!
//! Body: `{"ticket_text": "...", "model": "openai" | "bedrock" | ...}`.
//! `model` is optional; anything but `"bedrock"` classifies through the
//! chat-completion provider.

use axum::Json;
use bytes::Bytes;
use serde_json::Value;
use triage_core::{
  classifier::Classifier,
  provider::Provider,
  store::TicketStore,
  ticket::TicketRecord,
};

use crate::error::ApiError;

/// Read the request body; an empty body counts as `{}`.
fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(Value::Object(Default::default()));
  }
  serde_json::from_slice(body).map_err(|_| ApiError::BadRequest("invalid JSON body".into()))
}

pub async fn handler<S, C, M>(
  classifier: &Classifier<S, C, M>,
  body: &Bytes,
) -> Result<Json<TicketRecord>, ApiError>
where
  S: TicketStore,
  C: Provider,
  M: Provider,
{
  let body = parse_body(body)?;

  let ticket_text = body
    .get("ticket_text")
    .and_then(Value::as_str)
    .ok_or_else(|| ApiError::BadRequest("ticket_text required".into()))?;
  let selector = body.get("model").and_then(Value::as_str);

  let record = classifier.handle_classify(ticket_text, selector).await?;
  Ok(Json(record))
}
