//! Deadly-signal path: dying state, crash message, preserve-and-exit.
//!
//! # Restrictions
//! The crash message and the dying state are built as if in signal-handler
//! context:
//! - the message is formatted into a pre-sized buffer, never the heap
//! - the dying state is a single atomic store, no locks
//! - the preservation routine is the last call; nothing runs after it
//!
//! Logging is exempt. It goes through `tracing` and may allocate, which is
//! fine because dispatch runs on the loop task, not in the raw handler.

use std::fmt::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::signals::application::Application;

/// Capacity of the crash message buffer.
pub const MESSAGE_CAPACITY: usize = 1024;

/// Process-wide "a deadly signal was seen" flag. Never reset.
#[derive(Debug, Clone, Default)]
pub struct DyingState {
    dying: Arc<AtomicBool>,
}

impl DyingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag. Returns true if this call made the transition.
    pub fn mark(&self) -> bool {
        !self.dying.swap(true, Ordering::Relaxed)
    }

    pub fn is_dying(&self) -> bool {
        self.dying.load(Ordering::Relaxed)
    }
}

/// Fixed-size text buffer. Writes past the end are truncated.
pub struct MessageBuffer<const N: usize = MESSAGE_CAPACITY> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> MessageBuffer<N> {
    pub const fn new() -> Self {
        Self { buf: [0; N], len: 0 }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_str(&self) -> &str {
        // Writes only ever stop on char boundaries.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const N: usize> Default for MessageBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Write for MessageBuffer<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = N - self.len;
        let mut take = s.len().min(room);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for MessageBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuffer")
            .field("capacity", &N)
            .field("text", &self.as_str())
            .finish()
    }
}

/// Run the deadly path for `signum`.
///
/// Marks the process as dying, records the signal, formats the crash
/// message and hands it to the application's preservation routine.
pub(crate) fn deadly_signal<A: Application>(
    signum: i32,
    name: &'static str,
    prefix: &str,
    dying: &DyingState,
    message: &mut MessageBuffer,
    app: &mut A,
) {
    app.set_dying_var(1);
    dying.mark();

    tracing::warn!(signal = signum, name, "got deadly signal");

    message.clear();
    let _ = write!(message, "{}: Caught deadly signal '{}'\r\n", prefix, name);

    app.preserve_exit(message.as_str());
}
