//! Ticket types: the persisted record and the category taxonomy.
//!
//! A [`TicketRecord`] is written exactly once, at classify time, and is never
//! updated or deleted afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};
use uuid::Uuid;

// ─── Category ────────────────────────────────────────────────────────────────

/// The closed set of labels the classifier prompt asks a model to choose from.
///
/// Persisted records keep the category as a free string; a model is free to
/// answer outside this set and the answer is stored verbatim.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  AsRefStr,
  Display,
  EnumIter,
)]
pub enum Category {
  Network,
  Billing,
  Hardware,
  Software,
  Account,
  Other,
}

// ─── TicketRecord ────────────────────────────────────────────────────────────

/// A classified support ticket, one document per ticket keyed by
/// `ticket_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
  pub ticket_id:   Uuid,
  pub ticket_text: String,
  pub category:    String,
  pub confidence:  f64,
  pub explanation: String,
  /// Identifier of the model that produced the classification.
  pub model:       String,
  /// Server-assigned timestamp; never changes after creation.
  #[serde(with = "timestamp")]
  pub created_at:  DateTime<Utc>,
}

/// Sort `records` newest first and keep at most `limit` of them.
///
/// Ties on `created_at` keep their incoming order.
pub fn newest_first(mut records: Vec<TicketRecord>, limit: usize) -> Vec<TicketRecord> {
  records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  records.truncate(limit);
  records
}

// ─── Timestamp wire format ───────────────────────────────────────────────────

/// `created_at` is rendered as RFC 3339 UTC with fixed microsecond precision
/// and a trailing `Z`, so lexicographic order matches chronological order.
pub mod timestamp {
  use chrono::{DateTime, SecondsFormat, Utc};
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn format(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
  }

  pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
  }

  pub fn serialize<S: Serializer>(
    dt: &DateTime<Utc>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(dt))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<DateTime<Utc>, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(serde::de::Error::custom)
  }
}
