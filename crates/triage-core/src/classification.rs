//! Classification results and the best-effort reply parser.
//!
//! Providers wrap model output in different envelopes, but once unwrapped
//! the model text is always expected to be a JSON object with the keys
//! `category`, `confidence` and `explanation`. [`parse_reply`] normalises
//! that object into a [`ClassificationResult`]; when it cannot, the caller
//! gets a [`ParseError`] whose [`fallback`](ParseError::fallback) decides
//! what is persisted instead.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::ticket::Category;

/// Explanation recorded when a managed-invocation envelope cannot be
/// unwrapped.
pub const UNPARSEABLE_EXPLANATION: &str = "Could not parse model response.";

// ─── Result ──────────────────────────────────────────────────────────────────

/// A normalised classification: always exactly these three fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
  pub category:    String,
  /// Always within `[0, 1]`.
  pub confidence:  f64,
  pub explanation: String,
}

impl ClassificationResult {
  /// The `Other` / `0.0` result used whenever a reply is unusable.
  pub fn other(explanation: impl Into<String>) -> Self {
    Self {
      category:    Category::Other.to_string(),
      confidence:  0.0,
      explanation: explanation.into(),
    }
  }
}

// ─── ParseError ──────────────────────────────────────────────────────────────

/// Why a provider reply could not be read as a classification.
///
/// The variant picks the fallback explanation: chat-completion replies keep
/// the raw model text, managed-invocation envelopes collapse to
/// [`UNPARSEABLE_EXPLANATION`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
  #[error("model reply is not a classification object")]
  RawText(String),

  #[error("could not unwrap response envelope: {0}")]
  Envelope(String),
}

impl ParseError {
  pub fn fallback(self) -> ClassificationResult {
    match self {
      ParseError::RawText(raw) => ClassificationResult::other(raw),
      ParseError::Envelope(_) => ClassificationResult::other(UNPARSEABLE_EXPLANATION),
    }
  }
}

/// A parsed reply, or the reason it could not be parsed.
pub type Parsed = Result<ClassificationResult, ParseError>;

/// Collapse a [`Parsed`] reply into a result, substituting the error's
/// fallback.
pub trait Fallback {
  fn fallback(self) -> ClassificationResult;
}

impl Fallback for Parsed {
  fn fallback(self) -> ClassificationResult {
    self.unwrap_or_else(ParseError::fallback)
  }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse model text as a classification object.
///
/// Fails with [`ParseError::RawText`] carrying `text` when it is not a JSON
/// object. Individual fields are lenient; see [`normalize`].
pub fn parse_reply(text: &str) -> Parsed {
  match serde_json::from_str::<Value>(text.trim()) {
    Ok(obj @ Value::Object(_)) => Ok(normalize(&obj)),
    _ => Err(ParseError::RawText(text.to_owned())),
  }
}

/// Normalise a JSON object into a [`ClassificationResult`].
///
/// - `category`: non-empty string after trimming, else `Other`.
/// - `confidence`: see [`coerce_confidence`].
/// - `explanation`: strings as-is, missing/null as empty, anything else as
///   compact JSON.
pub fn normalize(obj: &Value) -> ClassificationResult {
  let category = obj
    .get("category")
    .and_then(Value::as_str)
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .unwrap_or_else(|| Category::Other.to_string());

  let confidence = obj.get("confidence").map(coerce_confidence).unwrap_or(0.0);

  let explanation = match obj.get("explanation") {
    None | Some(Value::Null) => String::new(),
    Some(Value::String(s)) => s.clone(),
    Some(other) => other.to_string(),
  };

  ClassificationResult { category, confidence, explanation }
}

/// Coerce a JSON value to a confidence in `[0, 1]`.
///
/// Numbers and numeric strings are accepted; everything else, including
/// non-finite values, is `0.0`. Finite values are clamped.
pub fn coerce_confidence(value: &Value) -> f64 {
  let raw = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  match raw {
    Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
    _ => 0.0,
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn parses_well_formed_reply() {
    let r = parse_reply(
      r#"{"category": "Billing", "confidence": 0.72, "explanation": "Refund request"}"#,
    )
    .unwrap();
    assert_eq!(r.category, "Billing");
    assert_eq!(r.confidence, 0.72);
    assert_eq!(r.explanation, "Refund request");
  }

  #[test]
  fn non_json_reply_keeps_raw_text() {
    let err = parse_reply("I cannot classify this").unwrap_err();
    assert_eq!(err, ParseError::RawText("I cannot classify this".into()));

    let r = err.fallback();
    assert_eq!(r.category, "Other");
    assert_eq!(r.confidence, 0.0);
    assert_eq!(r.explanation, "I cannot classify this");
  }

  #[test]
  fn json_that_is_not_an_object_is_rejected() {
    assert!(parse_reply("[1, 2]").is_err());
    assert!(parse_reply("\"Network\"").is_err());
    assert!(parse_reply("").is_err());
  }

  #[test]
  fn envelope_error_uses_fixed_explanation() {
    let r: Parsed = Err(ParseError::Envelope("no content".into()));
    let r = r.fallback();
    assert_eq!(r.category, "Other");
    assert_eq!(r.explanation, UNPARSEABLE_EXPLANATION);
  }

  #[test]
  fn missing_fields_get_defaults() {
    let r = parse_reply("{}").unwrap();
    assert_eq!(r, ClassificationResult::other(""));
  }

  #[test]
  fn blank_category_becomes_other() {
    let r = parse_reply(r#"{"category": "  ", "confidence": 0.4}"#).unwrap();
    assert_eq!(r.category, "Other");
    assert_eq!(r.confidence, 0.4);
  }

  #[test]
  fn off_taxonomy_category_is_kept() {
    let r = parse_reply(r#"{"category": "Shipping"}"#).unwrap();
    assert_eq!(r.category, "Shipping");
  }

  #[test]
  fn confidence_coercion() {
    assert_eq!(coerce_confidence(&json!(0.5)), 0.5);
    assert_eq!(coerce_confidence(&json!(1)), 1.0);
    assert_eq!(coerce_confidence(&json!("0.25")), 0.25);
    assert_eq!(coerce_confidence(&json!("high")), 0.0);
    assert_eq!(coerce_confidence(&json!(null)), 0.0);
    assert_eq!(coerce_confidence(&json!([0.3])), 0.0);
    assert_eq!(coerce_confidence(&json!(7.5)), 1.0);
    assert_eq!(coerce_confidence(&json!(-2)), 0.0);
    assert_eq!(coerce_confidence(&json!("NaN")), 0.0);
  }

  #[test]
  fn non_string_explanation_is_rendered() {
    let r = parse_reply(r#"{"category": "Account", "explanation": {"why": "locked"}}"#)
      .unwrap();
    assert_eq!(r.explanation, r#"{"why":"locked"}"#);
  }
}
