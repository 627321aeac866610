//! Error types for `triage-core`.

use thiserror::Error;

use crate::provider::TransportError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("ticket_text required")]
  EmptyTicket,

  #[error("provider error: {0}")]
  Provider(#[from] TransportError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
