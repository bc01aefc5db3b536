//! The application's single-threaded event loop.
//!
//! Signal deliveries and user input are multiplexed on one task, so the
//! signal subsystem and the editor are only ever touched from here.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::app::{Editor, Flow};
use crate::lifecycle::startup::AppSignals;
use crate::signals::{Application, DispatchQueue};

/// Run until the user quits or input ends. Returns the editor.
pub async fn run<R>(mut signals: AppSignals, mut queue: DispatchQueue, input: R) -> std::io::Result<Editor>
where
    R: AsyncBufRead + Unpin,
{
    signals.start();
    let mut lines = input.lines();

    loop {
        tokio::select! {
            Some(delivery) = queue.recv() => signals.handle(delivery),
            line = lines.next_line() => match line? {
                Some(line) => {
                    if signals.app_mut().command(&line) == Flow::Quit {
                        break;
                    }
                }
                None => {
                    tracing::debug!("Input closed");
                    if signals.app().buffers().iter().any(|b| b.is_modified()) {
                        signals.app_mut().sync_swap_files();
                    }
                    break;
                }
            },
        }
    }

    // Shutdown is already under way; a deadly signal now must not start a second one.
    signals.reject_deadly();
    let editor = signals.teardown();
    editor.close_swap_files();
    tracing::info!("Shutdown complete");
    Ok(editor)
}
