//! The interactive application hosting the signal subsystem.
//!
//! # Data Flow
//! ```text
//! stdin line → editor.rs command() → buffer.rs
//!
//! SIGPWR   → Application::sync_swap_files → swap.rs (modified buffers)
//! SIGUSR1  → Application::fire_signal_event → registered hooks
//! deadly   → Application::preserve_exit → swap.rs → process exit
//! ```

pub mod buffer;
pub mod editor;
pub mod swap;

pub use buffer::Buffer;
pub use editor::{Editor, Flow, SignalEvent, DYING_VAR};
pub use swap::{SwapError, SwapRecord, SwapStore};
