//! The `TicketStore` trait and scan types.
//!
//! The trait is implemented by storage backends (e.g. `triage-store-sqlite`).
//! The orchestrator and the HTTP router depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::ticket::{TicketRecord, newest_first};

/// Number of items requested per page by [`TicketStore::scan_all`].
pub const SCAN_PAGE_SIZE: usize = 100;

// ─── Scan types ──────────────────────────────────────────────────────────────

/// One page of an unordered table scan.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
  pub items:              Vec<TicketRecord>,
  /// Continuation key: pass as `start` to fetch the next page. `None` once
  /// the table is exhausted.
  pub last_evaluated_key: Option<Uuid>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the ticket table.
///
/// Records are insert-only: there is no update and no delete.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TicketStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `record` unconditionally, keyed by its `ticket_id`.
  fn put(
    &self,
    record: TicketRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Read up to `page_size` records following the exclusive start key
  /// `start`, in storage key order.
  fn scan_page(
    &self,
    start: Option<Uuid>,
    page_size: usize,
  ) -> impl Future<Output = Result<ScanPage, Self::Error>> + Send + '_;

  /// Read the whole table, following continuation keys until exhausted.
  ///
  /// The result is unordered and unlimited.
  fn scan_all(
    &self,
  ) -> impl Future<Output = Result<Vec<TicketRecord>, Self::Error>> + Send + '_ {
    async move {
      let mut all = Vec::new();
      let mut start = None;
      loop {
        let page = self.scan_page(start, SCAN_PAGE_SIZE).await?;
        all.extend(page.items);
        match page.last_evaluated_key {
          Some(key) => start = Some(key),
          None => break,
        }
      }
      tracing::debug!(count = all.len(), "scanned ticket table");
      Ok(all)
    }
  }

  /// The `limit` most recent records, newest first.
  ///
  /// The default is a full [`scan_all`](Self::scan_all) followed by an
  /// in-memory sort; backends with an index on `created_at` should
  /// override it.
  fn recent(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<TicketRecord>, Self::Error>> + Send + '_ {
    async move { Ok(newest_first(self.scan_all().await?, limit)) }
  }
}
