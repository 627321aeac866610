//! Helpers shared by the HTTP adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use triage_core::provider::TransportError;

/// Longest slice of an error body carried in [`TransportError::Http`].
const ERROR_BODY_LIMIT: usize = 512;

/// Build a client whose every request is bounded by `timeout`.
pub fn client(timeout: Duration) -> reqwest::Result<Client> {
  Client::builder().timeout(timeout).build()
}

/// Attach bearer auth unless no key is configured.
pub fn auth(req: RequestBuilder, api_key: &str) -> RequestBuilder {
  if api_key.is_empty() { req } else { req.bearer_auth(api_key) }
}

pub fn transport(e: reqwest::Error) -> TransportError {
  if e.is_timeout() {
    TransportError::Timeout
  } else {
    TransportError::Network(e.to_string())
  }
}

/// Send `req`, turning network failures and non-2xx statuses into
/// [`TransportError`]s.
pub async fn send(req: RequestBuilder) -> Result<Response, TransportError> {
  let resp = req.send().await.map_err(transport)?;
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }

  let mut body = resp.text().await.unwrap_or_default();
  if body.len() > ERROR_BODY_LIMIT {
    let cut = (0..=ERROR_BODY_LIMIT).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
    body.truncate(cut);
  }
  Err(TransportError::Http { status: status.as_u16(), body })
}
