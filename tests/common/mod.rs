//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crashsafe::signals::{
    Application, Capabilities, DispatchQueue, Dispatcher, EventLoop, MonitoredSignal,
    SignalSubsystem, SignalWatcher, SubsystemOptions,
};

pub const PREFIX: &str = "crashsafe-test";

#[derive(Default)]
struct LoopState {
    next_id: usize,
    bindings: Vec<(usize, i32, Dispatcher)>,
    failing: Vec<i32>,
    created: usize,
    closed: usize,
}

/// An event loop whose "OS" is driven by `raise()`.
#[derive(Clone, Default)]
pub struct FakeLoop {
    state: Rc<RefCell<LoopState>>,
}

impl FakeLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `signum` to every watcher bound to it. Returns how many.
    pub fn raise(&self, signum: i32) -> usize {
        let mut delivered = 0;
        for (_, bound, dispatcher) in self.state.borrow().bindings.iter() {
            if *bound == signum && dispatcher.deliver(signum) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Make registration of `signum` fail.
    pub fn fail_on(&self, signum: i32) {
        self.state.borrow_mut().failing.push(signum);
    }

    pub fn bound(&self, signum: i32) -> usize {
        self.state
            .borrow()
            .bindings
            .iter()
            .filter(|(_, n, _)| *n == signum)
            .count()
    }

    pub fn created(&self) -> usize {
        self.state.borrow().created
    }

    pub fn closed(&self) -> usize {
        self.state.borrow().closed
    }
}

impl EventLoop for FakeLoop {
    type Watcher = FakeWatcher;

    fn watcher_init(&self) -> FakeWatcher {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.created += 1;
        FakeWatcher {
            id: state.next_id,
            state: self.state.clone(),
        }
    }
}

pub struct FakeWatcher {
    id: usize,
    state: Rc<RefCell<LoopState>>,
}

impl SignalWatcher for FakeWatcher {
    fn start(&mut self, signum: i32, dispatcher: Dispatcher) -> io::Result<()> {
        if self.state.borrow().failing.contains(&signum) {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "not on this host"));
        }
        self.stop();
        self.state
            .borrow_mut()
            .bindings
            .push((self.id, signum, dispatcher));
        Ok(())
    }

    fn stop(&mut self) {
        let id = self.id;
        self.state.borrow_mut().bindings.retain(|(i, _, _)| *i != id);
    }

    fn close(mut self) {
        self.stop();
        self.state.borrow_mut().closed += 1;
    }
}

/// Application double that records every collaborator call.
#[derive(Debug, Default)]
pub struct RecordingApp {
    pub document: Option<String>,
    pub syncs: usize,
    pub dying_var: Option<i64>,
    pub events: Vec<(&'static str, Option<String>)>,
    pub exits: Vec<String>,
}

impl RecordingApp {
    pub fn touched(&self) -> bool {
        self.syncs > 0 || self.dying_var.is_some() || !self.events.is_empty() || !self.exits.is_empty()
    }
}

impl Application for RecordingApp {
    type Document = Option<String>;

    fn sync_swap_files(&mut self) {
        self.syncs += 1;
    }

    fn set_dying_var(&mut self, value: i64) {
        self.dying_var = Some(value);
    }

    fn current_document(&self) -> Option<String> {
        self.document.clone()
    }

    fn fire_signal_event(&mut self, name: &'static str, document: Option<String>) {
        self.events.push((name, document));
    }

    fn preserve_exit(&mut self, message: &str) {
        self.exits.push(message.to_string());
    }
}

/// Host table, with a stand-in number for SIGPWR where the host lacks it.
pub fn test_caps() -> Capabilities {
    let host = Capabilities::host();
    Capabilities::from_entries(|s| match s {
        MonitoredSignal::PowerFailure => host.signum(s).or(Some(60)),
        s => host.signum(s),
    })
}

pub fn signum(signal: MonitoredSignal) -> i32 {
    test_caps().signum(signal).unwrap()
}

pub type TestSubsystem = SignalSubsystem<FakeWatcher, RecordingApp>;

/// A subsystem on a fake loop, initialised but not started.
pub fn subsystem() -> (TestSubsystem, DispatchQueue, FakeLoop) {
    let event_loop = FakeLoop::new();
    let options = SubsystemOptions {
        crash_prefix: PREFIX.to_string(),
        clear_mask: false,
        capabilities: test_caps(),
        ..SubsystemOptions::default()
    };
    let (subsystem, queue) = SignalSubsystem::init(&event_loop, RecordingApp::default(), options);
    (subsystem, queue, event_loop)
}

/// Hand every queued delivery to the subsystem. Returns how many.
pub fn drain(subsystem: &mut TestSubsystem, queue: &mut DispatchQueue) -> usize {
    let mut handled = 0;
    while let Some(delivery) = queue.try_recv() {
        subsystem.handle(delivery);
        handled += 1;
    }
    handled
}

pub fn crash_message(name: &str) -> String {
    format!("{}: Caught deadly signal '{}'\r\n", PREFIX, name)
}
