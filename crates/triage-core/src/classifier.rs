//! The classification orchestrator.
//!
//! Picks a provider from the request's selector, folds unparseable replies
//! through their fallback, and persists the resulting [`TicketRecord`]
//! before handing it back.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
  Error, Result,
  classification::{ClassificationResult, ParseError},
  provider::{Provider, ProviderKind},
  store::TicketStore,
  ticket::TicketRecord,
};

/// Routes tickets to one of two providers and records the outcome.
pub struct Classifier<S, C, M> {
  store:   Arc<S>,
  chat:    C,
  managed: M,
}

impl<S, C, M> Classifier<S, C, M>
where
  S: TicketStore,
  C: Provider,
  M: Provider,
{
  pub fn new(store: Arc<S>, chat: C, managed: M) -> Self {
    Self { store, chat, managed }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Classify `ticket_text` with the provider chosen by `selector` and
  /// persist the record.
  ///
  /// Fails with [`Error::EmptyTicket`] when the trimmed text is empty; in
  /// that case nothing is written. Transport and store failures propagate.
  pub async fn handle_classify(
    &self,
    ticket_text: &str,
    selector: Option<&str>,
  ) -> Result<TicketRecord> {
    let text = ticket_text.trim();
    if text.is_empty() {
      return Err(Error::EmptyTicket);
    }

    let kind = ProviderKind::from_selector(selector);
    let (model, result) = match kind {
      ProviderKind::ChatCompletion => run(&self.chat, text).await?,
      ProviderKind::ManagedInvocation => run(&self.managed, text).await?,
    };
    tracing::info!(provider = %kind, model = %model, category = %result.category, "classified ticket");

    let record = TicketRecord {
      ticket_id:   Uuid::new_v4(),
      ticket_text: text.to_owned(),
      category:    result.category,
      confidence:  result.confidence,
      explanation: result.explanation,
      model,
      created_at:  Utc::now(),
    };

    self
      .store
      .put(record.clone())
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    Ok(record)
  }
}

async fn run<P: Provider>(provider: &P, text: &str) -> Result<(String, ClassificationResult)> {
  let result = provider
    .classify(text)
    .await?
    .unwrap_or_else(|e: ParseError| {
      tracing::warn!(model = provider.model_id(), error = %e, "falling back to Other");
      e.fallback()
    });
  Ok((provider.model_id().to_owned(), result))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    classification::UNPARSEABLE_EXPLANATION,
    testing::{FailingStore, MemoryStore, ScriptedProvider},
  };

  fn classifier(
    chat: ScriptedProvider,
    managed: ScriptedProvider,
  ) -> Classifier<MemoryStore, ScriptedProvider, ScriptedProvider> {
    Classifier::new(Arc::new(MemoryStore::default()), chat, managed)
  }

  const NETWORK: &str =
    r#"{"category": "Network", "confidence": 0.91, "explanation": "Network connectivity failure"}"#;

  #[tokio::test]
  async fn default_selector_uses_chat_provider_and_persists() {
    let c = classifier(
      ScriptedProvider::chat("gpt-test", NETWORK),
      ScriptedProvider::managed("claude-test", NETWORK),
    );

    let rec = c
      .handle_classify("  Router light blinking red, no internet ", None)
      .await
      .unwrap();
    assert_eq!(rec.ticket_text, "Router light blinking red, no internet");
    assert_eq!(rec.category, "Network");
    assert_eq!(rec.confidence, 0.91);
    assert_eq!(rec.model, "gpt-test");

    let stored = c.store().scan_all().await.unwrap();
    assert_eq!(stored, vec![rec]);
  }

  #[tokio::test]
  async fn bedrock_selector_uses_managed_provider() {
    let c = classifier(
      ScriptedProvider::chat("gpt-test", NETWORK),
      ScriptedProvider::managed("claude-test", NETWORK),
    );
    let rec = c.handle_classify("no internet", Some("bedrock")).await.unwrap();
    assert_eq!(rec.model, "claude-test");
  }

  #[tokio::test]
  async fn blank_ticket_is_rejected_and_not_stored() {
    let c = classifier(
      ScriptedProvider::chat("gpt-test", NETWORK),
      ScriptedProvider::managed("claude-test", NETWORK),
    );
    let err = c.handle_classify(" \n\t ", None).await.unwrap_err();
    assert!(matches!(err, Error::EmptyTicket));
    assert!(c.store().scan_all().await.unwrap().is_empty());
    assert_eq!(c.chat.calls(), 0);
    assert_eq!(c.managed.calls(), 0);
  }

  #[tokio::test]
  async fn unparseable_replies_fall_back_per_provider() {
    let c = classifier(
      ScriptedProvider::chat("gpt-test", "I cannot classify this"),
      ScriptedProvider::managed("claude-test", "I cannot classify this"),
    );

    let chat = c.handle_classify("???", Some("openai")).await.unwrap();
    assert_eq!(chat.category, "Other");
    assert_eq!(chat.confidence, 0.0);
    assert_eq!(chat.explanation, "I cannot classify this");

    let managed = c.handle_classify("???", Some("bedrock")).await.unwrap();
    assert_eq!(managed.category, "Other");
    assert_eq!(managed.confidence, 0.0);
    assert_eq!(managed.explanation, UNPARSEABLE_EXPLANATION);

    assert_eq!(c.store().scan_all().await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn transport_failure_propagates_and_stores_nothing() {
    let c = classifier(
      ScriptedProvider::failing("gpt-test"),
      ScriptedProvider::managed("claude-test", NETWORK),
    );
    let err = c.handle_classify("no internet", None).await.unwrap_err();
    assert!(matches!(err, Error::Provider(_)));
    assert!(c.store().scan_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn store_failure_propagates() {
    let c = Classifier::new(
      Arc::new(FailingStore),
      ScriptedProvider::chat("gpt-test", NETWORK),
      ScriptedProvider::managed("claude-test", NETWORK),
    );
    let err = c.handle_classify("no internet", None).await.unwrap_err();
    assert!(matches!(err, Error::Store(_)));
    assert!(err.to_string().contains("ticket table unavailable"));
    assert_eq!(c.chat.calls(), 1);
  }

  #[tokio::test]
  async fn every_call_gets_a_fresh_id() {
    let c = classifier(
      ScriptedProvider::chat("gpt-test", NETWORK),
      ScriptedProvider::managed("claude-test", NETWORK),
    );
    let (a, b) = tokio::join!(
      c.handle_classify("first", None),
      c.handle_classify("second", None),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.ticket_id, b.ticket_id);
    assert_eq!(c.store().scan_all().await.unwrap().len(), 2);
  }
}
