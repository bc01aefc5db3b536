//! crashsafe: a line editor that survives deadly signals.
//!
//! # Architecture Overview
//!
//! ```text
//!   OS signal ──▶ tokio signal driver ──▶ DispatchQueue ──┐
//!                                                         ▼
//!   stdin ─────────────────────────────────────────▶ event loop (one task)
//!                                                         │
//!                         ┌───────────────────────────────┴──────┐
//!                         ▼                                      ▼
//!                  SignalSubsystem                          Editor commands
//!             classify → deadly / flush / notify
//!                         │
//!                         ▼
//!              Editor::preserve_exit → swap files → exit(1)
//! ```

use std::path::PathBuf;

use clap::Parser;

use crashsafe::config::{load_config, AppConfig};
use crashsafe::lifecycle;

#[derive(Parser)]
#[command(name = "crashsafe")]
#[command(about = "Line editor with crash-safe signal handling", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Files to open as buffers.
    files: Vec<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    lifecycle::init_observability(&config);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "crashsafe starting");

    let (signals, queue) = lifecycle::build(&config, &cli.files)?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    lifecycle::run(signals, queue, stdin).await?;

    Ok(())
}
