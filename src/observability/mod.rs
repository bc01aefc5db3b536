//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (signal and swap counters)
//!
//! Consumers:
//!     → stderr (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`signal`, `name`) rather than formatted strings
//! - Metrics are cheap counter increments; with no recorder installed
//!   they are no-ops

pub mod logging;
pub mod metrics;
