//! Runtime capability table for monitored signals.
//!
//! # Responsibilities
//! - Name the fixed set of signals the subsystem watches
//! - Map each one to its OS number, or mark it absent on this host
//!
//! # Design Decisions
//! - Platform differences are resolved once, in `Capabilities::host()`
//! - Everything downstream (policy, watchers) only reads the table
//! - Lookups are linear scans over a fixed array: no allocation

/// A signal the subsystem knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitoredSignal {
    BrokenPipe,
    Hangup,
    Quit,
    Terminate,
    PowerFailure,
    User1,
}

impl MonitoredSignal {
    /// All monitored signals, in watcher order.
    pub const ALL: [MonitoredSignal; 6] = [
        MonitoredSignal::BrokenPipe,
        MonitoredSignal::Hangup,
        MonitoredSignal::Quit,
        MonitoredSignal::Terminate,
        MonitoredSignal::PowerFailure,
        MonitoredSignal::User1,
    ];

    /// Symbolic name, as shown to users and scripts.
    pub const fn name(self) -> &'static str {
        match self {
            MonitoredSignal::BrokenPipe => "SIGPIPE",
            MonitoredSignal::Hangup => "SIGHUP",
            MonitoredSignal::Quit => "SIGQUIT",
            MonitoredSignal::Terminate => "SIGTERM",
            MonitoredSignal::PowerFailure => "SIGPWR",
            MonitoredSignal::User1 => "SIGUSR1",
        }
    }
}

/// Availability of each monitored signal on the current host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    entries: [(MonitoredSignal, Option<i32>); 6],
}

impl Capabilities {
    /// Build the table for the host this binary was compiled for.
    pub fn host() -> Self {
        Self::from_entries(|signal| match signal {
            MonitoredSignal::BrokenPipe => Some(libc::SIGPIPE),
            MonitoredSignal::Hangup => Some(libc::SIGHUP),
            MonitoredSignal::Quit => Some(libc::SIGQUIT),
            MonitoredSignal::Terminate => Some(libc::SIGTERM),
            MonitoredSignal::PowerFailure => power_failure_signum(),
            MonitoredSignal::User1 => Some(libc::SIGUSR1),
        })
    }

    /// Build a table from an arbitrary mapping.
    pub fn from_entries(mut signum: impl FnMut(MonitoredSignal) -> Option<i32>) -> Self {
        let mut entries = [(MonitoredSignal::BrokenPipe, None); 6];
        for (slot, signal) in entries.iter_mut().zip(MonitoredSignal::ALL) {
            *slot = (signal, signum(signal));
        }
        Self { entries }
    }

    /// OS number for `signal`, if the host has it.
    pub fn signum(&self, signal: MonitoredSignal) -> Option<i32> {
        self.entries
            .iter()
            .find(|(s, _)| *s == signal)
            .and_then(|(_, n)| *n)
    }

    /// Reverse lookup: which monitored signal has OS number `signum`.
    pub fn lookup(&self, signum: i32) -> Option<MonitoredSignal> {
        self.entries
            .iter()
            .find(|(_, n)| *n == Some(signum))
            .map(|(s, _)| *s)
    }

    /// Signals present on this host, with their OS numbers.
    pub fn available(&self) -> impl Iterator<Item = (MonitoredSignal, i32)> + '_ {
        self.entries
            .iter()
            .filter_map(|(s, n)| n.map(|n| (*s, n)))
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::host()
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn power_failure_signum() -> Option<i32> {
    Some(libc::SIGPWR)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn power_failure_signum() -> Option<i32> {
    None
}
