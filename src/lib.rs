//! Crash-safe signal handling for a long-running interactive application.

pub mod app;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod signals;

pub use config::AppConfig;
pub use signals::{SignalSubsystem, SubsystemOptions};
