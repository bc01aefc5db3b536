//! Line editor: the application the signal subsystem protects.
//!
//! # Responsibilities
//! - Hold the open buffers and track which one is current
//! - Run user commands (`:w`, `:e`, `:ls`, `:q`, `:q!`)
//! - Implement the signal core's collaborators: swap sync, the `dying`
//!   variable, signal-event hooks, and preserve-and-exit

use std::collections::HashMap;
use std::path::Path;

use crate::app::buffer::Buffer;
use crate::app::swap::SwapStore;
use crate::observability::metrics;
use crate::signals::{Application, DeadlyGate};

/// Script variable holding the dying flag.
pub const DYING_VAR: &str = "dying";

/// What the event loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A user-visible signal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalEvent {
    /// Symbolic signal name, e.g. `"SIGUSR1"`.
    pub signal: &'static str,
    /// Name of the buffer that was current when the signal arrived.
    pub document: Option<String>,
}

type SignalHook = Box<dyn FnMut(&SignalEvent)>;

pub struct Editor {
    name: String,
    buffers: Vec<Buffer>,
    current: usize,
    swap: SwapStore,
    vars: HashMap<&'static str, i64>,
    hooks: Vec<SignalHook>,
    gate: DeadlyGate,
    really_exiting: bool,
}

impl Editor {
    /// An editor with one scratch buffer. `name` prefixes user messages.
    pub fn new(name: impl Into<String>, swap: SwapStore, gate: DeadlyGate) -> Self {
        let mut vars = HashMap::new();
        vars.insert(DYING_VAR, 0);
        Self {
            name: name.into(),
            buffers: vec![Buffer::scratch()],
            current: 0,
            swap,
            vars,
            hooks: Vec::new(),
            gate,
            really_exiting: false,
        }
    }

    /// Open `path` (or switch to it if already open) and make it current.
    pub fn edit(&mut self, path: &Path) -> std::io::Result<()> {
        let name = path.display().to_string();
        if let Some(index) = self.buffers.iter().position(|b| b.name() == name) {
            self.current = index;
            return Ok(());
        }

        let buffer = Buffer::open(path)?;
        // Replace the initial scratch buffer if it was never touched.
        if self.buffers.len() == 1 && self.buffers[0].path().is_none() && !self.buffers[0].is_modified() {
            self.buffers[0] = buffer;
            self.current = 0;
        } else {
            self.buffers.push(buffer);
            self.current = self.buffers.len() - 1;
        }
        Ok(())
    }

    pub fn current(&self) -> &Buffer {
        &self.buffers[self.current]
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn swap(&self) -> &SwapStore {
        &self.swap
    }

    /// Value of a script variable.
    pub fn var(&self, name: &str) -> Option<i64> {
        self.vars.get(name).copied()
    }

    /// Register a hook run on every user signal event.
    pub fn on_signal_event(&mut self, hook: impl FnMut(&SignalEvent) + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Run one line of user input.
    ///
    /// Lines starting with `:` are commands; anything else is appended to
    /// the current buffer. An unknown command is reported, not appended.
    pub fn command(&mut self, input: &str) -> Flow {
        let input = input.trim_end_matches(['\r', '\n']);
        let Some(command) = input.strip_prefix(':') else {
            self.buffers[self.current].append(input);
            return Flow::Continue;
        };
        let (name, arg) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
        let arg = arg.trim();

        match name {
            "q!" => Flow::Quit,
            "q" => {
                if let Some(buffer) = self.buffers.iter().find(|b| b.is_modified()) {
                    eprintln!("No write since last change for buffer \"{}\"", buffer.name());
                    Flow::Continue
                } else {
                    Flow::Quit
                }
            }
            "w" => {
                let buffer = &mut self.buffers[self.current];
                match buffer.write() {
                    Ok(()) => {
                        self.swap.remove(buffer.name());
                        tracing::info!(buffer = buffer.name(), lines = buffer.lines().len(), "Buffer written");
                    }
                    Err(e) => eprintln!("Cannot write \"{}\": {}", buffer.name(), e),
                }
                Flow::Continue
            }
            "e" if arg.is_empty() => {
                eprintln!("Argument required: :e FILE");
                Flow::Continue
            }
            "e" => {
                if let Err(e) = self.edit(Path::new(arg)) {
                    eprintln!("Cannot open \"{}\": {}", arg, e);
                }
                Flow::Continue
            }
            "ls" => {
                for (i, buffer) in self.buffers.iter().enumerate() {
                    let marker = if i == self.current { '%' } else { ' ' };
                    let modified = if buffer.is_modified() { '+' } else { ' ' };
                    println!("{:3} {}{} \"{}\"", i + 1, marker, modified, buffer.name());
                }
                Flow::Continue
            }
            _ => {
                eprintln!("Not an editor command: {}", input);
                Flow::Continue
            }
        }
    }

    /// Remove swap files of buffers that no longer need them.
    pub fn close_swap_files(&self) {
        for buffer in self.buffers.iter().filter(|b| !b.is_modified()) {
            self.swap.remove(buffer.name());
        }
    }

    /// Preserve modified buffers and return the exit code to use.
    ///
    /// A second call (a deadly signal during preservation) gives up at
    /// once with code 2.
    pub fn preserve(&mut self, message: &str) -> i32 {
        if self.really_exiting {
            eprint!("{}", message);
            return 2;
        }
        self.really_exiting = true;
        self.gate.reject();

        eprint!("{}", message);

        self.close_swap_files();
        if self.buffers.iter().any(Buffer::is_modified) {
            eprintln!("{}: preserving files...", self.name);
            let written = self.swap.sync_modified(&self.buffers);
            metrics::record_swap_sync("preserve", written);
        }

        eprintln!("{}: Finished.", self.name);
        1
    }
}

impl Application for Editor {
    type Document = Option<String>;

    fn sync_swap_files(&mut self) {
        let written = self.swap.sync_modified(&self.buffers);
        metrics::record_swap_sync("power", written);
    }

    fn set_dying_var(&mut self, value: i64) {
        self.vars.insert(DYING_VAR, value);
    }

    fn current_document(&self) -> Option<String> {
        let buffer = self.current();
        buffer.path().map(|_| buffer.name().to_string())
    }

    fn fire_signal_event(&mut self, name: &'static str, document: Option<String>) {
        let event = SignalEvent {
            signal: name,
            document,
        };
        tracing::info!(signal = name, document = ?event.document, hooks = self.hooks.len(), "Signal event");
        for hook in &mut self.hooks {
            hook(&event);
        }
    }

    fn preserve_exit(&mut self, message: &str) {
        let code = self.preserve(message);
        std::process::exit(code);
    }
}
