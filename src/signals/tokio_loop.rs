//! Event-loop binding backed by Tokio's Unix signal driver.
//!
//! Tokio installs one process-wide raw handler per signal number. That
//! handler only flags the arrival and writes a byte to a self-pipe; the
//! forwarding task below runs later on the runtime, never in handler
//! context.
//!
//! Tokio never uninstalls a raw handler. After `stop()` the signal is
//! still caught by the process, it just has nobody to forward to.
//! `close()` puts back the action the signal had before the first bind
//! (ignore or default), so after teardown SIGTERM kills again and SIGPIPE
//! stays ignored. Only one subsystem per process may use these watchers:
//! closing one resets the signal for every Tokio stream in the process.

use std::io;

use nix::sys::signal::SigHandler;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;

use crate::signals::mask::{current_disposition, restore_disposition};
use crate::signals::watcher::{Dispatcher, EventLoop, SignalWatcher};

/// A Tokio runtime acting as the application's event loop.
#[derive(Debug, Clone)]
pub struct TokioLoop {
    handle: Handle,
}

impl TokioLoop {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime the caller is running on.
    pub fn current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }
}

impl EventLoop for TokioLoop {
    type Watcher = TokioWatcher;

    fn watcher_init(&self) -> TokioWatcher {
        TokioWatcher {
            handle: self.handle.clone(),
            task: None,
            previous: None,
        }
    }
}

/// One signal stream plus the task forwarding it to the dispatch queue.
#[derive(Debug)]
pub struct TokioWatcher {
    handle: Handle,
    task: Option<JoinHandle<()>>,
    /// Signal number and its action before the first bind.
    previous: Option<(i32, SigHandler)>,
}

impl SignalWatcher for TokioWatcher {
    fn start(&mut self, signum: i32, dispatcher: Dispatcher) -> io::Result<()> {
        self.stop();
        if self.previous.is_none() {
            self.previous = Some((signum, current_disposition(signum)));
        }

        let mut stream = {
            let _guard = self.handle.enter();
            signal(SignalKind::from_raw(signum))?
        };

        self.task = Some(self.handle.spawn(async move {
            while stream.recv().await.is_some() {
                if !dispatcher.deliver(signum) {
                    break;
                }
            }
        }));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn close(mut self) {
        self.stop();
        if let Some((signum, handler)) = self.previous.take() {
            if restore_disposition(signum, handler) {
                tracing::debug!(signal = signum, ?handler, "signal action restored");
            }
        }
    }
}
