//! Progress and completion notifications.
//!
//! [`ProgressEmitter`] is a callback registry. Handlers are invoked
//! synchronously on the calling thread, in registration order, once per
//! processed file entry. There is no buffering and no replay: a handler
//! registered after an event was published never sees it.
//!
//! Warning subscribers receive each [`OutputWarning`] as soon as it is
//! recorded, so a warning is seen even when the entry that raised it then
//! fails and the operation returns an error.
//!
//! # Examples
//!
//! ```
//! use archivist_core::progress::ProgressEmitter;
//! use archivist_core::progress::ProgressEvent;
//! use std::path::PathBuf;
//!
//! let mut emitter = ProgressEmitter::new();
//! emitter.on_progress(|event| {
//!     println!("[{}/{}] {}", event.current, event.total, event.file_name.display());
//! });
//! emitter.on_complete(|_| println!("done"));
//!
//! emitter.emit_progress(&ProgressEvent::new(1, 1, PathBuf::from("a.txt")));
//! emitter.emit_complete();
//! ```

use std::fmt;
use std::path::PathBuf;

use crate::report::OutputWarning;

/// Progress of a single processed file entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// 1-based number of the entry just processed.
    pub current: usize,
    /// Total reported alongside `current`.
    pub total: usize,
    /// Destination path (extraction) or normalized entry name (listing).
    pub file_name: PathBuf,
}

impl ProgressEvent {
    /// Creates a new progress event.
    #[must_use]
    pub fn new(current: usize, total: usize, file_name: PathBuf) -> Self {
        Self {
            current,
            total,
            file_name,
        }
    }
}

/// Marks the end of an extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionEvent;

type ProgressHandler = Box<dyn FnMut(&ProgressEvent) + Send>;
type CompletionHandler = Box<dyn FnMut(&CompletionEvent) + Send>;
type WarningHandler = Box<dyn FnMut(&OutputWarning) + Send>;

/// Registry of progress, completion and warning subscribers.
#[derive(Default)]
pub struct ProgressEmitter {
    progress: Vec<ProgressHandler>,
    complete: Vec<CompletionHandler>,
    warning: Vec<WarningHandler>,
}

impl ProgressEmitter {
    /// Creates an emitter with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to progress events.
    pub fn on_progress<F>(&mut self, handler: F)
    where
        F: FnMut(&ProgressEvent) + Send + 'static,
    {
        self.progress.push(Box::new(handler));
    }

    /// Subscribes to completion events.
    pub fn on_complete<F>(&mut self, handler: F)
    where
        F: FnMut(&CompletionEvent) + Send + 'static,
    {
        self.complete.push(Box::new(handler));
    }

    /// Subscribes to recoverable output warnings.
    pub fn on_warning<F>(&mut self, handler: F)
    where
        F: FnMut(&OutputWarning) + Send + 'static,
    {
        self.warning.push(Box::new(handler));
    }

    /// Delivers a progress event to every progress subscriber.
    pub fn emit_progress(&mut self, event: &ProgressEvent) {
        for handler in &mut self.progress {
            handler(event);
        }
    }

    /// Delivers a completion event to every completion subscriber.
    pub fn emit_complete(&mut self) {
        let event = CompletionEvent;
        for handler in &mut self.complete {
            handler(&event);
        }
    }

    /// Delivers a warning to every warning subscriber.
    pub fn emit_warning(&mut self, warning: &OutputWarning) {
        for handler in &mut self.warning {
            handler(warning);
        }
    }

    /// Returns the number of registered subscribers of every kind.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.progress.len() + self.complete.len() + self.warning.len()
    }

    /// Removes all subscribers.
    pub fn clear(&mut self) {
        self.progress.clear();
        self.complete.clear();
        self.warning.clear();
    }
}

impl fmt::Debug for ProgressEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressEmitter")
            .field("progress", &self.progress.len())
            .field("complete", &self.complete.len())
            .field("warning", &self.warning.len())
            .finish()
    }
}

/// Counts entries as they are processed and publishes progress.
///
/// Keeps the numbering 1-based and monotonic for one operation.
pub(crate) struct ProgressTracker<'a> {
    emitter: &'a mut ProgressEmitter,
    current: usize,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(emitter: &'a mut ProgressEmitter) -> Self {
        Self {
            emitter,
            current: 0,
        }
    }

    /// Advances the counter and returns the new 1-based value.
    pub(crate) fn advance(&mut self) -> usize {
        self.current += 1;
        self.current
    }

    pub(crate) fn publish(&mut self, total: usize, file_name: PathBuf) {
        self.emitter
            .emit_progress(&ProgressEvent::new(self.current, total, file_name));
    }

    pub(crate) fn complete(&mut self) {
        self.emitter.emit_complete();
    }

    pub(crate) fn warn(&mut self, warning: &OutputWarning) {
        self.emitter.emit_warning(warning);
    }

    pub(crate) fn processed(&self) -> usize {
        self.current
    }
}
