//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps use the record's own wire format so that string order in the
//! `created_at` index is chronological. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, Utc};
use triage_core::ticket::{TicketRecord, timestamp};
use uuid::Uuid;

use crate::Result;

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { timestamp::format(&dt) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> { Ok(timestamp::parse(s)?) }

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` against `tickets`, in the order
/// [`RawTicket::from_row`] reads them.
pub const TICKET_COLUMNS: &str =
  "ticket_id, ticket_text, category, confidence, explanation, model, created_at";

/// Raw values read directly from a `tickets` row.
pub struct RawTicket {
  pub ticket_id:   String,
  pub ticket_text: String,
  pub category:    String,
  pub confidence:  f64,
  pub explanation: String,
  pub model:       String,
  pub created_at:  String,
}

impl RawTicket {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      ticket_id:   row.get(0)?,
      ticket_text: row.get(1)?,
      category:    row.get(2)?,
      confidence:  row.get(3)?,
      explanation: row.get(4)?,
      model:       row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn into_record(self) -> Result<TicketRecord> {
    Ok(TicketRecord {
      ticket_id:   decode_uuid(&self.ticket_id)?,
      ticket_text: self.ticket_text,
      category:    self.category,
      confidence:  self.confidence,
      explanation: self.explanation,
      model:       self.model,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
