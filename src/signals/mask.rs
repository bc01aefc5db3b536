//! Process-wide signal state: the thread mask at startup and signal
//! dispositions at teardown.

use nix::sys::signal::{pthread_sigmask, sigaction, SaFlags, SigAction, SigHandler, SigSet, SigmaskHow, Signal};

/// Unblock every signal on the calling thread.
///
/// An inherited mask (e.g. SIGCHLD blocked by the parent) can stall the
/// event loop. A failure is logged and startup continues.
pub fn clear_signal_mask() -> bool {
    match pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(&SigSet::empty()), None) {
        Ok(()) => true,
        Err(errno) => {
            tracing::warn!(error = %errno, "could not unblock signals, signal handling may be degraded");
            false
        }
    }
}

/// The action `signum` has right now, as ignore or default.
///
/// An installed handler reads as default: that is what the process gets
/// back once the handler is removed.
pub fn current_disposition(signum: i32) -> SigHandler {
    let mut old = std::mem::MaybeUninit::<libc::sigaction>::zeroed();
    // SAFETY: a null new action only queries; the kernel fills `old`.
    let rc = unsafe { libc::sigaction(signum, std::ptr::null(), old.as_mut_ptr()) };
    if rc != 0 {
        return SigHandler::SigDfl;
    }
    // SAFETY: zero-initialised and, on success, written by the kernel.
    let old = unsafe { old.assume_init() };
    if old.sa_sigaction == libc::SIG_IGN {
        SigHandler::SigIgn
    } else {
        SigHandler::SigDfl
    }
}

/// Put `signum` back to `handler` (`SigDfl` or `SigIgn`).
///
/// Replaces whatever raw handler the event loop installed. A failure is
/// logged and the handler stays in place.
pub fn restore_disposition(signum: i32, handler: SigHandler) -> bool {
    let signal = match Signal::try_from(signum) {
        Ok(signal) => signal,
        Err(errno) => {
            tracing::warn!(signal = signum, error = %errno, "cannot restore action of unknown signal");
            return false;
        }
    };
    let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
    // SAFETY: SIG_DFL and SIG_IGN run no code in this process.
    match unsafe { sigaction(signal, &action) } {
        Ok(_) => true,
        Err(errno) => {
            tracing::warn!(signal = signum, error = %errno, "could not restore signal action");
            false
        }
    }
}
