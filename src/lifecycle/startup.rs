//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and metrics from the validated configuration
//! - Open the requested buffers
//! - Create the signal subsystem on the current runtime
//!
//! # Design Decisions
//! - Fail fast: a buffer that cannot be opened is a startup error
//! - The editor and the subsystem share one deadly gate from the start

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::runtime::TryCurrentError;

use crate::app::{Editor, SwapStore};
use crate::config::AppConfig;
use crate::observability::{logging, metrics};
use crate::signals::{
    Capabilities, DeadlyGate, DispatchQueue, SignalSubsystem, SubsystemOptions, TokioLoop,
    TokioWatcher,
};

/// The signal subsystem as wired for the editor.
pub type AppSignals = SignalSubsystem<TokioWatcher, Editor>;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no Tokio runtime to attach signal watchers to: {0}")]
    Runtime(#[from] TryCurrentError),

    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Set up logging and, if enabled, the metrics exporter.
pub fn init_observability(config: &AppConfig) {
    logging::init(&config.observability.log_level);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }
}

/// Build the editor and its signal subsystem. Watchers are not started.
pub fn build(config: &AppConfig, files: &[PathBuf]) -> Result<(AppSignals, DispatchQueue), StartupError> {
    let gate = DeadlyGate::new();
    let mut editor = Editor::new(
        config.signals.crash_prefix.clone(),
        SwapStore::new(&config.swap.directory),
        gate.clone(),
    );
    for path in files {
        open(&mut editor, path)?;
    }

    let options = SubsystemOptions {
        crash_prefix: config.signals.crash_prefix.clone(),
        clear_mask: config.signals.clear_mask,
        capabilities: Capabilities::host(),
        gate,
    };

    let event_loop = TokioLoop::current()?;
    let (signals, queue) = SignalSubsystem::init(&event_loop, editor, options);

    tracing::info!(
        buffers = signals.app().buffers().len(),
        watchers = signals.watchers().len(),
        swap_dir = %config.swap.directory.display(),
        "Startup complete"
    );
    Ok((signals, queue))
}

fn open(editor: &mut Editor, path: &Path) -> Result<(), StartupError> {
    editor.edit(path).map_err(|source| StartupError::Open {
        path: path.to_path_buf(),
        source,
    })
}
