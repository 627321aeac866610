//! Handler for `GET /tickets`: the most recent tickets, newest first.

use axum::Json;
use triage_core::{store::TicketStore, ticket::TicketRecord};

use crate::error::ApiError;

/// Maximum number of tickets in a listing.
pub const RECENT_LIMIT: usize = 20;

pub async fn handler<S: TicketStore>(store: &S) -> Result<Json<Vec<TicketRecord>>, ApiError> {
  let records = store
    .recent(RECENT_LIMIT)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(records))
}
