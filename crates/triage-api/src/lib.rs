//! JSON HTTP API for the ticket classifier.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `…/classify` | Body: `{"ticket_text", "model"?}`; returns the stored record |
//! | `GET`  | `…/tickets`  | The 20 most recent records, newest first |
//!
//! Routes match on the end of the path, so the API can sit behind a stage
//! prefix (`/prod/classify`). Everything else is a 404.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = triage_api::api_router(Arc::new(classifier));
//! ```

pub mod classify;
pub mod error;
pub mod tickets;

use std::sync::Arc;

use axum::{
  Router,
  extract::State,
  http::{Method, Uri},
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use triage_core::{classifier::Classifier, provider::Provider, store::TicketStore};

pub use error::ApiError;

/// Build the API router around `classifier`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, C, M>(classifier: Arc<Classifier<S, C, M>>) -> Router<()>
where
  S: TicketStore + 'static,
  C: Provider + 'static,
  M: Provider + 'static,
{
  Router::new()
    .fallback(dispatch::<S, C, M>)
    .with_state(classifier)
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Route {
  Classify,
  Tickets,
}

/// Any path ending in a route name matches it. A trailing slash does not.
fn route(uri: &Uri) -> Option<Route> {
  let path = uri.path();
  if path.ends_with("classify") {
    Some(Route::Classify)
  } else if path.ends_with("tickets") {
    Some(Route::Tickets)
  } else {
    None
  }
}

async fn dispatch<S, C, M>(
  State(classifier): State<Arc<Classifier<S, C, M>>>,
  method: Method,
  uri: Uri,
  body: Bytes,
) -> Response
where
  S: TicketStore + 'static,
  C: Provider + 'static,
  M: Provider + 'static,
{
  match (method, route(&uri)) {
    (Method::POST, Some(Route::Classify)) => {
      classify::handler(&classifier, &body).await.into_response()
    }
    (Method::GET, Some(Route::Tickets)) => {
      tickets::handler(classifier.store().as_ref()).await.into_response()
    }
    _ => ApiError::UnknownPath.into_response(),
  }
}
