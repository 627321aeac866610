//! Runtime server configuration.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file, then
//! `TRIAGE_*` environment variables (`TRIAGE_OPENAI_API_KEY` sets
//! `openai_api_key`).

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;
use triage_providers::{ChatCompletionConfig, ManagedInvocationConfig};

pub const ENV_PREFIX: &str = "TRIAGE";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  /// SQLite file holding the ticket table; a leading `~/` is expanded.
  pub store_path:           PathBuf,
  pub openai_api_key:       String,
  pub openai_model:         String,
  pub openai_base_url:      String,
  pub bedrock_region:       String,
  pub bedrock_model:        String,
  pub bedrock_api_key:      String,
  /// Overrides the regional runtime endpoint derived from `bedrock_region`.
  pub bedrock_base_url:     Option<String>,
  /// Bound on every outbound provider call.
  pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "0.0.0.0".into(),
      port:                 8080,
      store_path:           PathBuf::from("tickets.db"),
      openai_api_key:       String::new(),
      openai_model:         "gpt-4o-mini".into(),
      openai_base_url:      "https://api.openai.com".into(),
      bedrock_region:       "ap-south-1".into(),
      bedrock_model:        "anthropic.claude-3-haiku-20240307-v1:0".into(),
      bedrock_api_key:      String::new(),
      bedrock_base_url:     None,
      request_timeout_secs: 30,
    }
  }
}

impl ServerConfig {
  /// Load from `path` (skipped if missing) and the process environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_sources(
      File::from(path).required(false),
      Environment::with_prefix(ENV_PREFIX),
    )
  }

  fn from_sources<F>(file: F, env: Environment) -> Result<Self, ConfigError>
  where
    F: Source + Send + Sync + 'static,
  {
    Config::builder()
      .add_source(file)
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  fn timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }

  pub fn chat_completion(&self) -> ChatCompletionConfig {
    ChatCompletionConfig {
      base_url: self.openai_base_url.clone(),
      api_key:  self.openai_api_key.clone(),
      model:    self.openai_model.clone(),
      timeout:  self.timeout(),
    }
  }

  pub fn managed_invocation(&self) -> ManagedInvocationConfig {
    ManagedInvocationConfig {
      base_url: self
        .bedrock_base_url
        .clone()
        .unwrap_or_else(|| ManagedInvocationConfig::regional_endpoint(&self.bedrock_region)),
      api_key:  self.bedrock_api_key.clone(),
      model:    self.bedrock_model.clone(),
      timeout:  self.timeout(),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
