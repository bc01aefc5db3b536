//! Reject/accept gate for deadly signals.
//!
//! # Design Decisions
//! - Last write wins: no nesting, no reference count
//! - Cloned handles share one flag so the preservation routine can close
//!   the gate while the subsystem is borrowed
//! - Only the loop thread mutates it; the atomic exists so handles stay
//!   `Send`, not for cross-thread coordination

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag: while rejecting, deadly signals are swallowed.
#[derive(Debug, Clone, Default)]
pub struct DeadlyGate {
    rejecting: Arc<AtomicBool>,
}

impl DeadlyGate {
    /// A gate in the accepting state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop handling deadly signals.
    pub fn reject(&self) {
        self.rejecting.store(true, Ordering::Relaxed);
    }

    /// Resume handling deadly signals.
    pub fn accept(&self) {
        self.rejecting.store(false, Ordering::Relaxed);
    }

    pub fn is_rejecting(&self) -> bool {
        self.rejecting.load(Ordering::Relaxed)
    }
}
