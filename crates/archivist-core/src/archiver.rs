//! The archiver facade.

use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::codec::ArchiveFormat;
use crate::codec::ArchiveReader;
use crate::codec::ReaderRegistry;
use crate::config::ArchiverConfig;
use crate::dispatch;
use crate::dispatch::CompressionKind;
use crate::extract;
use crate::progress::CompletionEvent;
use crate::progress::ProgressEmitter;
use crate::progress::ProgressEvent;
use crate::report::CreationReport;
use crate::report::ExtractionReport;
use crate::report::OutputWarning;

/// Compresses, extracts and lists archives, publishing progress to
/// registered subscribers.
///
/// # Examples
///
/// ```no_run
/// use archivist_core::Archiver;
/// use archivist_core::CompressionKind;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut archiver = Archiver::new();
/// archiver.on_progress(|event| {
///     println!("[{}/{}] {}", event.current, event.total, event.file_name.display());
/// });
/// archiver.on_complete(|_| println!("done"));
///
/// archiver.compress("backup.zip", "./project", CompressionKind::Zip)?;
/// let report = archiver.uncompress("backup.zip", "/tmp/restore")?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Archiver {
    config: ArchiverConfig,
    emitter: ProgressEmitter,
    registry: ReaderRegistry,
}

impl Archiver {
    /// Creates an archiver with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an archiver with `config`.
    #[must_use]
    pub fn with_config(config: ArchiverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ArchiverConfig {
        &self.config
    }

    /// Compresses `source` (a directory, a file, or nothing at all) into
    /// `target` using the strategy for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` cannot be written or a source file
    /// cannot be read. A partially written `target` is left in place.
    pub fn compress<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        target: P,
        source: Q,
        kind: CompressionKind,
    ) -> Result<CreationReport> {
        dispatch::compress(target.as_ref(), source.as_ref(), kind, &self.config)
    }

    /// Compresses `files` into a stream archive at `target`, each under its
    /// base name.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` cannot be written or a file cannot be
    /// read.
    pub fn compress_files<P: AsRef<Path>>(
        &self,
        target: P,
        files: &[PathBuf],
    ) -> Result<CreationReport> {
        dispatch::compress_files(target.as_ref(), files, &self.config)
    }

    /// Extracts `source` into `target_dir`.
    ///
    /// Publishes one progress event per extracted file, then one completion
    /// event.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is unsupported, the archive cannot be
    /// read, an entry name is rejected, or a file cannot be written.
    pub fn uncompress<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        source: P,
        target_dir: Q,
    ) -> Result<ExtractionReport> {
        let mut reader = self.registry.open(source.as_ref())?;
        extract::uncompress(
            reader.as_mut(),
            target_dir.as_ref(),
            &self.config,
            &mut self.emitter,
        )
    }

    /// Lists the file entries of `source` without extracting them.
    ///
    /// Publishes one progress event per entry and no completion event.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is unsupported, the archive cannot be
    /// read, or an entry name is rejected.
    pub fn list_files<P: AsRef<Path>>(&mut self, source: P) -> Result<Vec<String>> {
        let mut reader = self.registry.open(source.as_ref())?;
        extract::list_files(reader.as_mut(), &self.config, &mut self.emitter)
    }

    /// Subscribes to progress events.
    pub fn on_progress<F>(&mut self, handler: F)
    where
        F: FnMut(&ProgressEvent) + Send + 'static,
    {
        self.emitter.on_progress(handler);
    }

    /// Subscribes to completion events.
    pub fn on_complete<F>(&mut self, handler: F)
    where
        F: FnMut(&CompletionEvent) + Send + 'static,
    {
        self.emitter.on_complete(handler);
    }

    /// Subscribes to recoverable output warnings raised during extraction.
    ///
    /// Warnings arrive as they happen, including those raised by an entry
    /// whose write then fails and aborts [`uncompress`](Self::uncompress).
    pub fn on_warning<F>(&mut self, handler: F)
    where
        F: FnMut(&OutputWarning) + Send + 'static,
    {
        self.emitter.on_warning(handler);
    }

    /// Removes every progress, completion and warning subscriber.
    pub fn clear_subscribers(&mut self) {
        self.emitter.clear();
    }

    /// Registers a reader for `format`, e.g. to read RAR archives.
    pub fn register_reader<F>(&mut self, format: ArchiveFormat, factory: F)
    where
        F: Fn(&Path) -> Result<Box<dyn ArchiveReader>> + Send + Sync + 'static,
    {
        self.registry.register(format, factory);
    }
}
