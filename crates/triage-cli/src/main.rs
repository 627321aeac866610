//! `triage`: terminal client for the ticket triage API.
//!
//! # Usage
//!
//! ```text
//! triage classify "Router light blinking red, no internet"
//! triage classify --model bedrock "I was charged twice this month"
//! triage recent
//! ```

mod client;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use client::ApiClient;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "triage", about = "Terminal client for the ticket triage API")]
struct Args {
  /// Base URL of the triage server.
  #[arg(long, env = "TRIAGE_URL", default_value = "http://localhost:8080")]
  url: String,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Classify a ticket and print the stored result.
  Classify {
    /// The ticket text.
    text:  String,
    #[arg(long, value_enum, default_value_t = ModelChoice::Auto)]
    model: ModelChoice,
  },
  /// List the most recent tickets with per-category counts.
  Recent,
}

/// Model selector sent to the server; `auto` lets the server pick.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModelChoice {
  Auto,
  Openai,
  Bedrock,
}

impl ModelChoice {
  fn selector(self) -> &'static str {
    match self {
      ModelChoice::Auto => "auto",
      ModelChoice::Openai => "openai",
      ModelChoice::Bedrock => "bedrock",
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let client = ApiClient::new(args.url)?;

  match args.command {
    Command::Classify { text, model } => {
      if text.trim().is_empty() {
        anyhow::bail!("ticket text must not be empty");
      }
      let rec = client.classify(&text, model.selector()).await?;
      print!("{}", report::render_result(&rec));
    }
    Command::Recent => {
      let records = client.recent().await?;
      if records.is_empty() {
        println!("No tickets found yet.");
        return Ok(());
      }
      print!("{}", report::render_table(&records));
      println!();
      println!("Tickets per category");
      print!("{}", report::render_counts(&report::category_counts(&records)));
    }
  }

  Ok(())
}
