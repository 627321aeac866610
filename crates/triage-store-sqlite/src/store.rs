//! [`SqliteStore`], the SQLite implementation of [`TicketStore`].

use std::path::Path;

use triage_core::{
  store::{ScanPage, TicketStore},
  ticket::TicketRecord,
};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{RawTicket, TICKET_COLUMNS, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A ticket table backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TicketStore impl ────────────────────────────────────────────────────────

impl TicketStore for SqliteStore {
  type Error = Error;

  async fn put(&self, record: TicketRecord) -> Result<()> {
    let id_str = encode_uuid(record.ticket_id);
    let at_str = encode_dt(record.created_at);

    self
      .conn
      .call(move |conn| {
        // Same-key writes replace the row, matching a document-store put.
        conn.execute(
          "INSERT OR REPLACE INTO tickets (
             ticket_id, ticket_text, category, confidence,
             explanation, model, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            record.ticket_text,
            record.category,
            record.confidence,
            record.explanation,
            record.model,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn scan_page(&self, start: Option<Uuid>, page_size: usize) -> Result<ScanPage> {
    let start_str = start.map(encode_uuid);
    // One extra row tells us whether a continuation key is needed.
    let fetch = page_size as i64 + 1;

    let raws: Vec<RawTicket> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TICKET_COLUMNS} FROM tickets
           WHERE ?1 IS NULL OR ticket_id > ?1
           ORDER BY ticket_id
           LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![start_str, fetch], RawTicket::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let more = raws.len() > page_size;
    let items: Vec<TicketRecord> = raws
      .into_iter()
      .take(page_size)
      .map(RawTicket::into_record)
      .collect::<Result<_>>()?;

    let last_evaluated_key = if more { items.last().map(|r| r.ticket_id) } else { None };
    Ok(ScanPage { items, last_evaluated_key })
  }

  async fn recent(&self, limit: usize) -> Result<Vec<TicketRecord>> {
    let limit_val = limit as i64;

    let raws: Vec<RawTicket> = self
      .conn
      .call(move |conn| {
        // Ties broken by key so results match the scan-and-sort default.
        let mut stmt = conn.prepare(&format!(
          "SELECT {TICKET_COLUMNS} FROM tickets
           ORDER BY created_at DESC, ticket_id ASC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawTicket::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(count = raws.len(), "read recent tickets");
    raws.into_iter().map(RawTicket::into_record).collect()
  }
}
