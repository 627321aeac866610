//! Managed-invocation adapter (Bedrock-style `InvokeModel` with an
//! Anthropic messages payload).
//!
//! The reply arrives in two layers: an outer response envelope whose body is
//! an opaque byte stream, and inside it a JSON document whose
//! `content[0].text` holds the model's own text. Both layers are unwrapped
//! here; any failure collapses to [`ParseError::Envelope`].

use std::time::Duration;

use bytes::Bytes;
use reqwest::{
  Client,
  header::{ACCEPT, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use triage_core::{
  classification::{ParseError, Parsed, parse_reply},
  prompt::{MAX_OUTPUT_TOKENS, SYSTEM_PROMPT, user_turn},
  provider::{Provider, TransportError},
};

use crate::http;

/// Payload version string required by Anthropic models on Bedrock.
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Connection settings for a managed-invocation endpoint.
#[derive(Debug, Clone)]
pub struct ManagedInvocationConfig {
  /// Runtime endpoint, e.g. `https://bedrock-runtime.ap-south-1.amazonaws.com`.
  pub base_url: String,
  /// Bearer API key; empty when the endpoint needs no auth.
  pub api_key:  String,
  pub model:    String,
  pub timeout:  Duration,
}

impl ManagedInvocationConfig {
  /// The public runtime endpoint for `region`.
  pub fn regional_endpoint(region: &str) -> String {
    format!("https://bedrock-runtime.{region}.amazonaws.com")
  }
}

/// Classifies tickets through `POST {base_url}/model/{model}/invoke`.
#[derive(Debug, Clone)]
pub struct ManagedInvocationProvider {
  client: Client,
  config: ManagedInvocationConfig,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
  anthropic_version: &'static str,
  system:            &'static str,
  messages:          [InvokeMessage<'a>; 1],
  max_tokens:        u32,
}

#[derive(Debug, Serialize)]
struct InvokeMessage<'a> {
  role:    &'static str,
  content: &'a str,
}

/// The outer layer: what the runtime hands back before the body is read.
#[derive(Debug, Clone)]
pub struct InvokeModelResponse {
  pub content_type: Option<String>,
  pub body:         Bytes,
}

/// The inner layer: the model's JSON document.
#[derive(Debug, Deserialize)]
struct InvokeBody {
  #[serde(default)]
  content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
  text: Option<String>,
}

/// Reduce an [`InvokeModelResponse`] to a classification.
pub fn unwrap_envelope(resp: &InvokeModelResponse) -> Parsed {
  let body = std::str::from_utf8(&resp.body)
    .map_err(|e| ParseError::Envelope(format!("body is not UTF-8: {e}")))?;
  let inner: InvokeBody = serde_json::from_str(body)
    .map_err(|e| ParseError::Envelope(format!("body is not a model document: {e}")))?;
  let text = inner
    .content
    .into_iter()
    .next()
    .and_then(|block| block.text)
    .ok_or_else(|| ParseError::Envelope("no text in content[0]".into()))?;
  parse_reply(&text).map_err(|e| ParseError::Envelope(e.to_string()))
}

/// Percent-encode everything outside the RFC 3986 unreserved set. Model ids
/// carry `:` version suffixes and inference-profile ARNs carry `/`.
fn encode_segment(segment: &str) -> String {
  let mut out = String::with_capacity(segment.len());
  for b in segment.bytes() {
    if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
      out.push(b as char);
    } else {
      out.push_str(&format!("%{b:02X}"));
    }
  }
  out
}

// ─── Provider ────────────────────────────────────────────────────────────────

impl ManagedInvocationProvider {
  pub fn new(config: ManagedInvocationConfig) -> reqwest::Result<Self> {
    let client = http::client(config.timeout)?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/model/{}/invoke",
      self.config.base_url.trim_end_matches('/'),
      encode_segment(&self.config.model),
    )
  }

  /// Invoke the model and return the outer envelope unread.
  async fn invoke(&self, text: &str) -> Result<InvokeModelResponse, TransportError> {
    let user = user_turn(text);
    let request = InvokeRequest {
      anthropic_version: ANTHROPIC_VERSION,
      system:            SYSTEM_PROMPT,
      messages:          [InvokeMessage { role: "user", content: &user }],
      max_tokens:        MAX_OUTPUT_TOKENS,
    };

    let req = http::auth(self.client.post(self.url()), &self.config.api_key)
      .header(CONTENT_TYPE, "application/json")
      .header(ACCEPT, "application/json")
      .json(&request);
    let resp = http::send(req).await?;

    let content_type = resp
      .headers()
      .get(CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .map(str::to_owned);
    let body = resp.bytes().await.map_err(http::transport)?;
    Ok(InvokeModelResponse { content_type, body })
  }
}

impl Provider for ManagedInvocationProvider {
  fn model_id(&self) -> &str { &self.config.model }

  async fn classify(&self, text: &str) -> Result<Parsed, TransportError> {
    let envelope = self.invoke(text).await?;
    tracing::debug!(
      model = %self.config.model,
      content_type = ?envelope.content_type,
      bytes = envelope.body.len(),
      "model invocation reply"
    );
    Ok(unwrap_envelope(&envelope))
  }
}
