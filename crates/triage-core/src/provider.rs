//! The `Provider` trait and provider selection.
//!
//! Implemented by the adapters in `triage-providers`. The orchestrator only
//! sees this trait, so provider envelope quirks never leak past an adapter.

use std::{fmt, future::Future};

use thiserror::Error;

use crate::classification::Parsed;

// ─── Selection ───────────────────────────────────────────────────────────────

/// Which backend classifies a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
  /// REST chat-completion API.
  ChatCompletion,
  /// Managed model-invocation API with a nested response envelope.
  ManagedInvocation,
}

impl ProviderKind {
  /// Map the request's `model` selector to a provider.
  ///
  /// `"bedrock"` (trimmed, ASCII case-insensitive) selects
  /// [`ManagedInvocation`](Self::ManagedInvocation). Everything else,
  /// including a missing selector, `"openai"`, `"auto"` and unknown
  /// strings, falls through to [`ChatCompletion`](Self::ChatCompletion).
  pub fn from_selector(selector: Option<&str>) -> Self {
    match selector.map(str::trim) {
      Some(s) if s.eq_ignore_ascii_case("bedrock") => Self::ManagedInvocation,
      _ => Self::ChatCompletion,
    }
  }
}

impl fmt::Display for ProviderKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::ChatCompletion => "chat_completion",
      Self::ManagedInvocation => "managed_invocation",
    })
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A provider call that did not produce a reply at all.
///
/// Unlike [`ParseError`](crate::classification::ParseError) these are never
/// recovered locally.
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("provider returned HTTP {status}: {body}")]
  Http { status: u16, body: String },

  #[error("provider request timed out")]
  Timeout,

  #[error("provider request failed: {0}")]
  Network(String),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A model backend that classifies one ticket per call.
pub trait Provider: Send + Sync {
  /// The model identifier recorded on every ticket this provider classifies.
  fn model_id(&self) -> &str;

  /// Classify `text`.
  ///
  /// The outer `Result` is the transport; the inner [`Parsed`] is whether
  /// the reply could be read as a classification.
  fn classify<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Parsed, TransportError>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bedrock_selects_managed_invocation() {
    assert_eq!(
      ProviderKind::from_selector(Some("bedrock")),
      ProviderKind::ManagedInvocation
    );
    assert_eq!(
      ProviderKind::from_selector(Some(" Bedrock ")),
      ProviderKind::ManagedInvocation
    );
  }

  #[test]
  fn everything_else_selects_chat_completion() {
    for sel in [None, Some("openai"), Some("auto"), Some(""), Some("gemini"), Some("bedrock-v2")] {
      assert_eq!(
        ProviderKind::from_selector(sel),
        ProviderKind::ChatCompletion,
        "selector {sel:?}"
      );
    }
  }
}
