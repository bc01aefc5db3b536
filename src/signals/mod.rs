//! Signal dispatch and crash-safe shutdown.
//!
//! # Data Flow
//! ```text
//! OS signal
//!     → event loop (tokio_loop.rs: raw handler + self-pipe)
//!     → watcher.rs (Delivery into DispatchQueue)
//!     → subsystem.rs handle() on the loop thread
//!     → policy.rs classify()
//!         Ignorable → nothing, or swap sync (SIGPWR)
//!         Deadly    → gate.rs check → deadly.rs → Application::preserve_exit
//!         User      → Application::fire_signal_event
//!         Unknown   → error log
//! ```
//!
//! # Design Decisions
//! - All state lives in one `SignalSubsystem`, not in globals
//! - Platform differences live in one capability table, not in cfg branches
//! - The crash message and dying state allocate nothing and take no locks

pub mod application;
pub mod capabilities;
pub mod deadly;
pub mod gate;
pub mod mask;
pub mod policy;
pub mod subsystem;
pub mod tokio_loop;
pub mod watcher;

pub use application::Application;
pub use capabilities::{Capabilities, MonitoredSignal};
pub use deadly::{DyingState, MessageBuffer};
pub use gate::DeadlyGate;
pub use policy::{classify, signal_name, SignalClass};
pub use subsystem::{SignalSubsystem, SubsystemOptions};
pub use tokio_loop::{TokioLoop, TokioWatcher};
pub use watcher::{Delivery, DispatchQueue, Dispatcher, EventLoop, SignalWatcher, WatcherSet};
