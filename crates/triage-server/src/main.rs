//! triage-server binary.
//!
//! Reads `triage.toml` (or the path given with `--config`) plus `TRIAGE_*`
//! environment variables, opens the SQLite ticket store, and serves the
//! classify/tickets API over HTTP.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use triage_core::classifier::Classifier;
use triage_providers::{ChatCompletionProvider, ManagedInvocationProvider};
use triage_store_sqlite::SqliteStore;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Support ticket triage server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "triage.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let server_cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  if server_cfg.openai_api_key.is_empty() {
    tracing::warn!("openai_api_key is not set; chat-completion requests will be unauthenticated");
  }

  // Open SQLite store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Build providers.
  let chat = ChatCompletionProvider::new(server_cfg.chat_completion())
    .context("failed to build chat-completion client")?;
  let managed = ManagedInvocationProvider::new(server_cfg.managed_invocation())
    .context("failed to build model-invocation client")?;

  let classifier = Classifier::new(Arc::new(store), chat, managed);
  let app = triage_api::api_router(Arc::new(classifier)).layer(TraceLayer::new_for_http());

  let address = server_cfg.address();
  tracing::info!(
    openai_model = %server_cfg.openai_model,
    bedrock_model = %server_cfg.bedrock_model,
    "Listening on http://{address}"
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
