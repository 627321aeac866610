//! Test doubles: a scripted provider, an in-memory ticket store and a store
//! that always fails.
//!
//! Compiled for this crate's own tests and, through the `testing` feature,
//! for downstream crates' tests.

use std::{
  collections::BTreeMap,
  convert::Infallible,
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use thiserror::Error;
use uuid::Uuid;

use crate::{
  classification::{ParseError, Parsed, parse_reply},
  provider::{Provider, TransportError},
  store::{ScanPage, TicketStore},
  ticket::TicketRecord,
};

// ─── ScriptedProvider ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Script {
  /// Parse the reply the way the chat-completion adapter does.
  Chat(String),
  /// Parse the reply the way the managed-invocation adapter does.
  Managed(String),
  Fail,
}

/// A [`Provider`] that answers every call with the same canned model text.
#[derive(Debug)]
pub struct ScriptedProvider {
  model:  String,
  script: Script,
  calls:  AtomicUsize,
}

impl ScriptedProvider {
  fn new(model: &str, script: Script) -> Self {
    Self { model: model.to_owned(), script, calls: AtomicUsize::new(0) }
  }

  /// Replies with `reply`; unparseable text keeps its raw form.
  pub fn chat(model: &str, reply: &str) -> Self {
    Self::new(model, Script::Chat(reply.to_owned()))
  }

  /// Replies with `reply`; unparseable text becomes an envelope error.
  pub fn managed(model: &str, reply: &str) -> Self {
    Self::new(model, Script::Managed(reply.to_owned()))
  }

  /// Every call fails with a transport error.
  pub fn failing(model: &str) -> Self { Self::new(model, Script::Fail) }

  /// Number of `classify` calls seen so far.
  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl Provider for ScriptedProvider {
  fn model_id(&self) -> &str { &self.model }

  async fn classify(&self, _text: &str) -> Result<Parsed, TransportError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    match &self.script {
      Script::Chat(reply) => Ok(parse_reply(reply)),
      Script::Managed(reply) => {
        Ok(parse_reply(reply).map_err(|e| ParseError::Envelope(e.to_string())))
      }
      Script::Fail => Err(TransportError::Http {
        status: 503,
        body:   "upstream unavailable".into(),
      }),
    }
  }
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

/// A [`TicketStore`] holding records in a map ordered by `ticket_id`.
///
/// Relies on the trait's default `scan_all` and `recent`.
#[derive(Debug, Default)]
pub struct MemoryStore {
  records: Mutex<BTreeMap<Uuid, TicketRecord>>,
}

impl TicketStore for MemoryStore {
  type Error = Infallible;

  async fn put(&self, record: TicketRecord) -> Result<(), Infallible> {
    self
      .records
      .lock()
      .unwrap()
      .insert(record.ticket_id, record);
    Ok(())
  }

  async fn scan_page(
    &self,
    start: Option<Uuid>,
    page_size: usize,
  ) -> Result<ScanPage, Infallible> {
    let records = self.records.lock().unwrap();
    let mut iter = records
      .iter()
      .filter(|(id, _)| start.is_none_or(|s| **id > s))
      .map(|(_, r)| r.clone());

    let items: Vec<_> = iter.by_ref().take(page_size).collect();
    let last_evaluated_key = match iter.next() {
      Some(_) => items.last().map(|r| r.ticket_id),
      None => None,
    };
    Ok(ScanPage { items, last_evaluated_key })
  }
}

// ─── FailingStore ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("ticket table unavailable")]
pub struct StoreUnavailable;

/// A [`TicketStore`] whose every read and write fails.
#[derive(Debug, Default)]
pub struct FailingStore;

impl TicketStore for FailingStore {
  type Error = StoreUnavailable;

  async fn put(&self, _record: TicketRecord) -> Result<(), StoreUnavailable> {
    Err(StoreUnavailable)
  }

  async fn scan_page(
    &self,
    _start: Option<Uuid>,
    _page_size: usize,
  ) -> Result<ScanPage, StoreUnavailable> {
    Err(StoreUnavailable)
  }
}
