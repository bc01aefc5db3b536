//! The signal subsystem context object.
//!
//! Owns the watcher set, the dying flag, the reject/accept gate and the
//! crash message buffer. Created once at process start; all mutation
//! happens on the event-loop thread that drains the `DispatchQueue`.
//! If this is ever driven from more than one OS thread, the flags need
//! real synchronisation, not just the relaxed atomics they use now.

use crate::observability::metrics;
use crate::signals::application::Application;
use crate::signals::capabilities::Capabilities;
use crate::signals::deadly::{deadly_signal, DyingState, MessageBuffer};
use crate::signals::gate::DeadlyGate;
use crate::signals::mask::clear_signal_mask;
use crate::signals::policy::{classify, signal_name, SignalClass};
use crate::signals::watcher::{
    dispatch_channel, Delivery, DispatchQueue, Dispatcher, EventLoop, SignalWatcher, WatcherSet,
};

/// Settings fixed at `init` time.
#[derive(Debug, Clone)]
pub struct SubsystemOptions {
    /// Prefix of the crash message, usually the program name.
    pub crash_prefix: String,
    /// Reset the thread's signal mask during `init`.
    pub clear_mask: bool,
    /// Which signals exist on this host.
    pub capabilities: Capabilities,
    /// Gate shared with the application's preservation routine.
    pub gate: DeadlyGate,
}

impl Default for SubsystemOptions {
    fn default() -> Self {
        Self {
            crash_prefix: env!("CARGO_PKG_NAME").to_string(),
            clear_mask: true,
            capabilities: Capabilities::host(),
            gate: DeadlyGate::new(),
        }
    }
}

/// Signal dispatch and crash-safe shutdown for one process.
pub struct SignalSubsystem<W: SignalWatcher, A: Application> {
    watchers: WatcherSet<W>,
    dispatcher: Dispatcher,
    epoch: u64,
    started: bool,
    caps: Capabilities,
    gate: DeadlyGate,
    dying: DyingState,
    message: MessageBuffer,
    crash_prefix: String,
    app: A,
}

impl<W: SignalWatcher, A: Application> SignalSubsystem<W, A> {
    /// Register one watcher per available signal with `event_loop`.
    ///
    /// Nothing is delivered until `start()`. The returned queue must be
    /// drained by the loop and each item passed to `handle()`.
    pub fn init<L>(event_loop: &L, app: A, options: SubsystemOptions) -> (Self, DispatchQueue)
    where
        L: EventLoop<Watcher = W>,
    {
        if options.clear_mask {
            clear_signal_mask();
        }

        let watchers = WatcherSet::init(event_loop, &options.capabilities);
        let (dispatcher, queue) = dispatch_channel();

        tracing::debug!(watchers = watchers.len(), "signal subsystem initialised");

        let subsystem = Self {
            watchers,
            dispatcher,
            epoch: 0,
            started: false,
            caps: options.capabilities,
            gate: options.gate,
            dying: DyingState::new(),
            message: MessageBuffer::new(),
            crash_prefix: options.crash_prefix,
            app,
        };
        (subsystem, queue)
    }

    /// Bind every watcher. Calling it again rebinds in place.
    pub fn start(&mut self) {
        self.watchers.start(&self.dispatcher.with_epoch(self.epoch));
        self.started = true;
        tracing::info!(bound = self.watchers.bound_count(), "signal watchers started");
    }

    /// Unbind every watcher. Deliveries already queued are discarded.
    ///
    /// The event loop's raw handlers stay installed until `teardown()`, so
    /// while stopped the process still catches the watched signals and
    /// deadly ones are swallowed instead of killing it.
    pub fn stop(&mut self) {
        self.watchers.stop();
        self.epoch += 1;
        self.started = false;
        tracing::debug!("signal watchers stopped");
    }

    /// Stop, release every watcher, and give the application back.
    ///
    /// Releasing a watcher restores the signal's prior action, so a deadly
    /// signal after teardown terminates the process.
    pub fn teardown(mut self) -> A {
        self.stop();
        let Self { watchers, app, .. } = self;
        watchers.teardown();
        tracing::debug!("signal subsystem torn down");
        app
    }

    /// Swallow deadly signals until `accept_deadly()`.
    pub fn reject_deadly(&self) {
        self.gate.reject();
    }

    /// Handle deadly signals again.
    pub fn accept_deadly(&self) {
        self.gate.accept();
    }

    /// Shared handle to the reject/accept gate.
    pub fn gate(&self) -> DeadlyGate {
        self.gate.clone()
    }

    /// Shared handle to the dying flag.
    pub fn dying(&self) -> DyingState {
        self.dying.clone()
    }

    pub fn is_dying(&self) -> bool {
        self.dying.is_dying()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The last crash message formatted by the deadly path.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn watchers(&self) -> &WatcherSet<W> {
        &self.watchers
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// Dispatch a queued delivery, unless it predates the last `stop()`.
    pub fn handle(&mut self, delivery: Delivery) {
        if !self.started
            || delivery.epoch != self.epoch
            || !self.watchers.is_bound(delivery.signum)
        {
            tracing::debug!(signal = delivery.signum, "dropping delivery for unbound watcher");
            return;
        }
        self.on_signal(delivery.signum);
    }

    /// Dispatch entry point: classify `signum` and act on it.
    pub fn on_signal(&mut self, signum: i32) {
        let name = signal_name(signum, &self.caps);
        let class = classify(signum, &self.caps);
        metrics::record_signal(name, class);

        match class {
            SignalClass::Ignorable { flush_swap: true } => {
                tracing::info!(signal = signum, name, "power failure, syncing swap files");
                self.app.sync_swap_files();
            }
            SignalClass::Ignorable { flush_swap: false } => {}
            SignalClass::Deadly => {
                if self.gate.is_rejecting() {
                    tracing::debug!(signal = signum, name, "deadly signal rejected");
                    metrics::record_deadly_rejected(name);
                } else {
                    deadly_signal(
                        signum,
                        name,
                        &self.crash_prefix,
                        &self.dying,
                        &mut self.message,
                        &mut self.app,
                    );
                }
            }
            SignalClass::UserNotify => {
                let document = self.app.current_document();
                self.app.fire_signal_event(name, document);
            }
            SignalClass::Unknown => {
                tracing::error!(signal = signum, "invalid signal");
            }
        }
    }
}
