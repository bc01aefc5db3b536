//! Dispatch policy: what to do with a delivered signal.
//!
//! ```text
//! SIGPWR                  → Ignorable { flush_swap: true }
//! SIGPIPE                 → Ignorable { flush_swap: false }
//! SIGTERM, SIGQUIT, SIGHUP → Deadly
//! SIGUSR1                 → UserNotify
//! anything else           → Unknown
//! ```

use crate::signals::capabilities::{Capabilities, MonitoredSignal};

/// Classification of a signal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalClass {
    /// No termination. `flush_swap` asks for a best-effort swap sync.
    Ignorable { flush_swap: bool },
    /// Preserve state and exit.
    Deadly,
    /// Fire the application's signal event.
    UserNotify,
    /// Not one of ours.
    Unknown,
}

impl SignalClass {
    /// Label used for metrics.
    pub const fn label(self) -> &'static str {
        match self {
            SignalClass::Ignorable { flush_swap: true } => "flush",
            SignalClass::Ignorable { flush_swap: false } => "ignore",
            SignalClass::Deadly => "deadly",
            SignalClass::UserNotify => "user",
            SignalClass::Unknown => "unknown",
        }
    }
}

/// Classify `signum` against the host's capability table.
pub fn classify(signum: i32, caps: &Capabilities) -> SignalClass {
    match caps.lookup(signum) {
        Some(MonitoredSignal::PowerFailure) => SignalClass::Ignorable { flush_swap: true },
        Some(MonitoredSignal::BrokenPipe) => SignalClass::Ignorable { flush_swap: false },
        Some(MonitoredSignal::Terminate | MonitoredSignal::Quit | MonitoredSignal::Hangup) => {
            SignalClass::Deadly
        }
        Some(MonitoredSignal::User1) => SignalClass::UserNotify,
        None => SignalClass::Unknown,
    }
}

/// Symbolic name of `signum`, or `"Unknown"`.
pub fn signal_name(signum: i32, caps: &Capabilities) -> &'static str {
    caps.lookup(signum).map_or("Unknown", MonitoredSignal::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        let caps = Capabilities::host();

        assert_eq!(classify(libc::SIGTERM, &caps), SignalClass::Deadly);
        assert_eq!(classify(libc::SIGQUIT, &caps), SignalClass::Deadly);
        assert_eq!(classify(libc::SIGHUP, &caps), SignalClass::Deadly);
        assert_eq!(classify(libc::SIGUSR1, &caps), SignalClass::UserNotify);
        assert_eq!(
            classify(libc::SIGPIPE, &caps),
            SignalClass::Ignorable { flush_swap: false }
        );

        #[cfg(target_os = "linux")]
        assert_eq!(
            classify(libc::SIGPWR, &caps),
            SignalClass::Ignorable { flush_swap: true }
        );
    }

    #[test]
    fn test_unknown_signals() {
        let caps = Capabilities::host();

        for signum in [-1, 0, libc::SIGINT, libc::SIGUSR2, libc::SIGCHLD, 1000] {
            assert_eq!(classify(signum, &caps), SignalClass::Unknown);
            assert_eq!(signal_name(signum, &caps), "Unknown");
        }
    }

    #[test]
    fn test_absent_signal_is_unknown() {
        let caps = Capabilities::from_entries(|s| match s {
            MonitoredSignal::PowerFailure => None,
            s => Capabilities::host().signum(s),
        });

        assert_eq!(signal_name(libc::SIGTERM, &caps), "SIGTERM");
        // 30 is SIGPWR on Linux and SIGUSR1 elsewhere; neither is in this table as SIGPWR.
        assert_ne!(classify(30, &caps), SignalClass::Ignorable { flush_swap: true });
    }
}
