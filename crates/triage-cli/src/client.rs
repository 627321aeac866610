//! Async HTTP client wrapping the triage JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde_json::json;
use triage_core::ticket::TicketRecord;

/// Async HTTP client for the triage API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: String) -> Result<Self> {
    let client = Client::builder()
      // Classification waits on a model round trip.
      .timeout(Duration::from_secs(90))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), path)
  }

  /// `POST /classify`
  pub async fn classify(&self, ticket_text: &str, model: &str) -> Result<TicketRecord> {
    let resp = self
      .client
      .post(self.url("/classify"))
      .json(&json!({ "ticket_text": ticket_text, "model": model }))
      .send()
      .await
      .context("POST /classify failed")?;

    if !resp.status().is_success() {
      let status = resp.status();
      let body = resp.text().await.unwrap_or_default();
      return Err(anyhow!("POST /classify → {status}: {body}"));
    }
    resp.json().await.context("deserialising ticket")
  }

  /// `GET /tickets`
  pub async fn recent(&self) -> Result<Vec<TicketRecord>> {
    let resp = self
      .client
      .get(self.url("/tickets"))
      .send()
      .await
      .context("GET /tickets failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /tickets → {}", resp.status()));
    }
    resp.json().await.context("deserialising tickets")
  }
}
