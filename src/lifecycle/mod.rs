//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Logging/metrics → Open buffers → Init signal subsystem
//!
//! Run (event_loop.rs):
//!     Start watchers → select { signal delivery, stdin line } → Quit
//!
//! Shutdown:
//!     Reject deadly signals → Teardown watchers → Drop clean swap files
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then observability, then subsystems
//! - Everything runs on a current-thread runtime

pub mod event_loop;
pub mod startup;

pub use event_loop::run;
pub use startup::{build, init_observability, AppSignals, StartupError};
