//! Provider adapters for the ticket classifier.
//!
//! Each adapter turns a ticket into one provider-specific HTTP request and
//! reduces the provider's response envelope to a
//! [`Parsed`](triage_core::classification::Parsed) classification.
//!
//! | Adapter | API |
//! |---------|-----|
//! | [`ChatCompletionProvider`] | OpenAI-style `POST /v1/chat/completions` |
//! | [`ManagedInvocationProvider`] | Bedrock-style `POST /model/{id}/invoke` |

mod http;

pub mod bedrock;
pub mod openai;

pub use bedrock::{ManagedInvocationConfig, ManagedInvocationProvider};
pub use openai::{ChatCompletionConfig, ChatCompletionProvider};

#[cfg(test)]
mod test_server;
