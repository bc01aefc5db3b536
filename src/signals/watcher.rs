//! Signal watchers and the delivery queue.
//!
//! # Data Flow
//! ```text
//! OS signal
//!     → event loop's raw handler (records arrival, wakes loop)
//!     → SignalWatcher forwards signum through its Dispatcher
//!     → DispatchQueue (drained on the loop thread)
//!     → SignalSubsystem::handle
//! ```
//!
//! # Lifecycle
//! - `WatcherSet::init`: one unbound handle per available signal
//! - `start`: bind every handle; failures are logged and skipped
//! - `stop`: unbind, keep handles
//! - `teardown`: stop, then close every handle (consumes the set)

use std::io;

use tokio::sync::mpsc;

use crate::signals::capabilities::{Capabilities, MonitoredSignal};

/// One signal arrival, tagged with the subsystem epoch it was bound under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub signum: i32,
    pub epoch: u64,
}

/// Sending half handed to each bound watcher.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Delivery>,
    epoch: u64,
}

impl Dispatcher {
    /// Queue `signum` for dispatch. Returns false once the queue is gone.
    pub fn deliver(&self, signum: i32) -> bool {
        self.tx
            .send(Delivery {
                signum,
                epoch: self.epoch,
            })
            .is_ok()
    }

    pub(crate) fn with_epoch(&self, epoch: u64) -> Self {
        Self {
            tx: self.tx.clone(),
            epoch,
        }
    }
}

/// Receiving half, drained by the application's event loop.
#[derive(Debug)]
pub struct DispatchQueue {
    rx: mpsc::UnboundedReceiver<Delivery>,
}

impl DispatchQueue {
    /// Wait for the next delivery.
    pub async fn recv(&mut self) -> Option<Delivery> {
        self.rx.recv().await
    }

    /// Take a delivery if one is already queued.
    pub fn try_recv(&mut self) -> Option<Delivery> {
        self.rx.try_recv().ok()
    }
}

pub(crate) fn dispatch_channel() -> (Dispatcher, DispatchQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Dispatcher { tx, epoch: 0 }, DispatchQueue { rx })
}

/// A handle into the event loop that can be bound to one signal.
pub trait SignalWatcher {
    /// Bind to `signum`; deliveries go through `dispatcher`.
    /// Binding an already-bound watcher replaces the old binding.
    fn start(&mut self, signum: i32, dispatcher: Dispatcher) -> io::Result<()>;

    /// Unbind. The handle stays usable for a later `start`.
    fn stop(&mut self);

    /// Release the handle.
    fn close(self);
}

/// The event loop's signal primitive.
pub trait EventLoop {
    type Watcher: SignalWatcher;

    /// Register a new, unbound watcher with the loop.
    fn watcher_init(&self) -> Self::Watcher;
}

struct Slot<W> {
    signal: MonitoredSignal,
    signum: i32,
    watcher: W,
    bound: bool,
}

/// Fixed set of watchers, one per monitored signal available on the host.
pub struct WatcherSet<W: SignalWatcher> {
    slots: Vec<Slot<W>>,
}

impl<W: SignalWatcher> WatcherSet<W> {
    /// Create one unbound watcher per available signal.
    pub fn init<L>(event_loop: &L, caps: &Capabilities) -> Self
    where
        L: EventLoop<Watcher = W>,
    {
        let slots = caps
            .available()
            .map(|(signal, signum)| Slot {
                signal,
                signum,
                watcher: event_loop.watcher_init(),
                bound: false,
            })
            .collect();
        Self { slots }
    }

    /// Bind every watcher to its signal.
    pub fn start(&mut self, dispatcher: &Dispatcher) {
        for slot in &mut self.slots {
            match slot.watcher.start(slot.signum, dispatcher.clone()) {
                Ok(()) => {
                    slot.bound = true;
                    tracing::debug!(signal = slot.signum, name = slot.signal.name(), "watcher bound");
                }
                Err(e) => {
                    slot.bound = false;
                    tracing::warn!(
                        signal = slot.signum,
                        name = slot.signal.name(),
                        error = %e,
                        "could not watch signal, skipping"
                    );
                }
            }
        }
    }

    /// Unbind every watcher.
    pub fn stop(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.bound) {
            slot.watcher.stop();
            slot.bound = false;
        }
    }

    /// Stop and release every watcher.
    pub fn teardown(mut self) {
        self.stop();
        for slot in self.slots {
            slot.watcher.close();
        }
    }

    /// True if some watcher is currently bound to `signum`.
    pub fn is_bound(&self, signum: i32) -> bool {
        self.slots.iter().any(|s| s.bound && s.signum == signum)
    }

    /// Number of watchers currently bound.
    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|s| s.bound).count()
    }

    /// Number of watcher handles (bound or not).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
