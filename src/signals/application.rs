//! Calls the signal core makes into the surrounding application.

/// Collaborators the signal subsystem depends on.
///
/// Implementations are driven from the loop thread only.
pub trait Application {
    /// Active-document context passed along with user signal events.
    type Document;

    /// Flush modified buffers to swap without closing anything.
    fn sync_swap_files(&mut self);

    /// Expose the dying flag to scripts.
    fn set_dying_var(&mut self, value: i64);

    /// Context of the document the user is currently working in.
    fn current_document(&self) -> Self::Document;

    /// Fire the user-visible signal event (`name` is e.g. `"SIGUSR1"`).
    fn fire_signal_event(&mut self, name: &'static str, document: Self::Document);

    /// Preserve unsaved state and terminate the process.
    ///
    /// Production implementations do not return. If one does, the caller
    /// makes no further recovery attempt.
    fn preserve_exit(&mut self, message: &str);
}
