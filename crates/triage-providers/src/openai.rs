//! Chat-completion adapter (OpenAI-compatible REST API).

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use triage_core::{
  classification::{ParseError, Parsed, parse_reply},
  prompt::{MAX_OUTPUT_TOKENS, SYSTEM_PROMPT, user_turn},
  provider::{Provider, TransportError},
};

use crate::http;

/// Connection settings for a chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionConfig {
  /// Scheme and host, e.g. `https://api.openai.com`.
  pub base_url: String,
  pub api_key:  String,
  pub model:    String,
  pub timeout:  Duration,
}

/// Classifies tickets through `POST {base_url}/v1/chat/completions`.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct ChatCompletionProvider {
  client: Client,
  config: ChatCompletionConfig,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model:       &'a str,
  messages:    [ChatMessage<'a>; 2],
  temperature: f32,
  max_tokens:  u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
  content: Option<String>,
}

// ─── Provider ────────────────────────────────────────────────────────────────

impl ChatCompletionProvider {
  pub fn new(config: ChatCompletionConfig) -> reqwest::Result<Self> {
    let client = http::client(config.timeout)?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'))
  }
}

/// Pull `choices[0].message.content` out of a completion body.
fn first_content(body: &str) -> Option<String> {
  serde_json::from_str::<ChatResponse>(body)
    .ok()?
    .choices
    .into_iter()
    .next()?
    .message
    .content
}

impl Provider for ChatCompletionProvider {
  fn model_id(&self) -> &str { &self.config.model }

  async fn classify(&self, text: &str) -> Result<Parsed, TransportError> {
    let user = user_turn(text);
    let request = ChatRequest {
      model:       &self.config.model,
      messages:    [
        ChatMessage { role: "system", content: SYSTEM_PROMPT },
        ChatMessage { role: "user", content: &user },
      ],
      temperature: 0.0,
      max_tokens:  MAX_OUTPUT_TOKENS,
    };

    let req = http::auth(self.client.post(self.url()), &self.config.api_key).json(&request);
    let body = http::send(req).await?.text().await.map_err(http::transport)?;
    tracing::debug!(model = %self.config.model, bytes = body.len(), "chat completion reply");

    // A completion without text content falls back on the whole body.
    Ok(match first_content(&body) {
      Some(content) => parse_reply(&content),
      None => Err(ParseError::RawText(body)),
    })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
  };
  use serde_json::{Value, json};

  use super::*;
  use crate::test_server::serve;

  fn provider(base_url: String, timeout: Duration) -> ChatCompletionProvider {
    ChatCompletionProvider::new(ChatCompletionConfig {
      base_url,
      api_key: "sk-test".into(),
      model: "gpt-4o-mini".into(),
      timeout,
    })
    .unwrap()
  }

  /// A fake completion endpoint answering with `content`, recording the
  /// last request body and authorization header.
  async fn fake_openai(content: &'static str) -> (String, Arc<Mutex<Option<(String, Value)>>>) {
    let seen = Arc::new(Mutex::new(None));
    let app = Router::new()
      .route(
        "/v1/chat/completions",
        post(
          move |State(seen): State<Arc<Mutex<Option<(String, Value)>>>>,
                headers: HeaderMap,
                Json(body): Json<Value>| async move {
            let auth = headers
              .get("authorization")
              .and_then(|v| v.to_str().ok())
              .unwrap_or_default()
              .to_owned();
            *seen.lock().unwrap() = Some((auth, body));
            Json(json!({
              "id": "chatcmpl-1",
              "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
            }))
          },
        ),
      )
      .with_state(seen.clone());
    (serve(app).await, seen)
  }

  #[tokio::test]
  async fn parses_reply_and_sends_expected_request() {
    let (url, seen) = fake_openai(
      r#"{"category": "Network", "confidence": 0.91, "explanation": "Network connectivity failure"}"#,
    )
    .await;
    let p = provider(url, Duration::from_secs(5));

    let parsed = p.classify("Router light blinking red, no internet").await.unwrap().unwrap();
    assert_eq!(parsed.category, "Network");
    assert_eq!(parsed.confidence, 0.91);

    let (auth, body) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(auth, "Bearer sk-test");
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["temperature"], 0.0);
    assert_eq!(body["max_tokens"], 200);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
    assert_eq!(body["messages"][1]["content"], "Ticket: Router light blinking red, no internet");
  }

  #[tokio::test]
  async fn unparseable_reply_keeps_raw_text() {
    let (url, _) = fake_openai("I cannot classify this").await;
    let p = provider(url, Duration::from_secs(5));

    let err = p.classify("???").await.unwrap().unwrap_err();
    assert_eq!(err, ParseError::RawText("I cannot classify this".into()));
  }

  #[tokio::test]
  async fn missing_content_falls_back_on_body() {
    let app = Router::new().route(
      "/v1/chat/completions",
      post(|| async { Json(json!({ "choices": [] })) }),
    );
    let p = provider(serve(app).await, Duration::from_secs(5));

    match p.classify("???").await.unwrap() {
      Err(ParseError::RawText(raw)) => assert!(raw.contains("choices")),
      other => panic!("unexpected: {other:?}"),
    }
  }

  #[tokio::test]
  async fn error_status_is_a_transport_error() {
    let app = Router::new().route(
      "/v1/chat/completions",
      post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
    );
    let p = provider(serve(app).await, Duration::from_secs(5));

    match p.classify("no internet").await {
      Err(TransportError::Http { status, body }) => {
        assert_eq!(status, 401);
        assert_eq!(body, "invalid api key");
      }
      other => panic!("unexpected: {other:?}"),
    }
  }

  #[tokio::test]
  async fn slow_provider_times_out() {
    let app = Router::new().route(
      "/v1/chat/completions",
      post(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!({ "choices": [] }))
      }),
    );
    let p = provider(serve(app).await, Duration::from_millis(100));

    assert!(matches!(p.classify("no internet").await, Err(TransportError::Timeout)));
  }

  #[tokio::test]
  async fn unreachable_provider_is_a_network_error() {
    let p = provider("http://127.0.0.1:9".into(), Duration::from_secs(2));
    assert!(matches!(
      p.classify("no internet").await,
      Err(TransportError::Network(_)) | Err(TransportError::Timeout)
    ));
  }
}
