//! Adapters over the `zip`, `tar` and `flate2` crates.
//!
//! Readers expose a common entry-by-entry interface ([`ArchiveReader`]) so
//! the extractor never depends on a concrete format. Writers cover the two
//! compression strategies: a zip container built from a directory tree, and
//! a gzip-compressed stream of named files.

pub mod detect;
pub mod gzip;
pub mod stream;
pub mod tar;
pub mod zip;

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use crate::ArchiveError;
use crate::Result;

pub use detect::detect_format;

/// Archive format as found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// ZIP container.
    Zip,
    /// Uncompressed tar stream.
    Tar,
    /// Tar stream inside gzip.
    TarGz,
    /// Bare gzip stream holding a single file.
    Gzip,
    /// RAR container. Read-only, needs a registered reader.
    Rar,
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::Gzip => "gzip",
            Self::Rar => "rar",
        };
        f.write_str(name)
    }
}

/// One stored entry, borrowed from an archive reader while it is visited.
pub struct ArchiveEntry<'a> {
    key: String,
    is_directory: bool,
    content: &'a mut dyn Read,
}

impl<'a> ArchiveEntry<'a> {
    /// Wraps an entry's stored key, directory flag and content stream.
    pub fn new(key: String, is_directory: bool, content: &'a mut dyn Read) -> Self {
        Self {
            key,
            is_directory,
            content,
        }
    }

    /// Stored relative path, `/`-separated.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the entry is a directory marker.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Writes the entry's content to `destination`, replacing any content
    /// already there, and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be created or the content
    /// cannot be decoded or written.
    pub fn write_to(&mut self, destination: &Path) -> Result<u64> {
        let mut writer = BufWriter::new(File::create(destination)?);
        let bytes = io::copy(&mut *self.content, &mut writer)?;
        writer.flush()?;
        Ok(bytes)
    }
}

impl fmt::Debug for ArchiveEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("key", &self.key)
            .field("is_directory", &self.is_directory)
            .finish_non_exhaustive()
    }
}

/// Callback receiving each entry of an archive in stored order.
pub type EntryVisitor<'v> = dyn FnMut(&mut ArchiveEntry<'_>) -> Result<()> + 'v;

/// An archive opened for reading.
///
/// Implementations release their file handles when dropped.
pub trait ArchiveReader {
    /// Format of the underlying archive.
    fn format(&self) -> ArchiveFormat;

    /// Number of non-directory entries.
    ///
    /// Stream formats may need an extra pass over the file to answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be read.
    fn file_count(&mut self) -> Result<usize>;

    /// Calls `visit` for every entry in stored order, stopping at the first
    /// error.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the archive or by `visit`.
    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<()>;
}

/// Opens a reader for an archive file.
pub type ReaderFactory = dyn Fn(&Path) -> Result<Box<dyn ArchiveReader>> + Send + Sync;

/// Maps detected formats to reader constructors.
///
/// Zip, tar, tar.gz and gzip are built in. RAR has no built-in reader: a
/// caller that needs it registers one with [`register`](Self::register),
/// which also overrides the built-in readers.
#[derive(Default)]
pub struct ReaderRegistry {
    custom: HashMap<ArchiveFormat, Box<ReaderFactory>>,
}

impl ReaderRegistry {
    /// Creates a registry with only the built-in readers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` for `format`, replacing any previous one.
    pub fn register<F>(&mut self, format: ArchiveFormat, factory: F)
    where
        F: Fn(&Path) -> Result<Box<dyn ArchiveReader>> + Send + Sync + 'static,
    {
        self.custom.insert(format, Box::new(factory));
    }

    /// Returns whether a reader exists for `format`.
    #[must_use]
    pub fn supports(&self, format: ArchiveFormat) -> bool {
        format != ArchiveFormat::Rar || self.custom.contains_key(&format)
    }

    /// Detects the format of `path` and opens a reader for it.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::UnsupportedFormat`] if the format is not recognized
    /// - [`ArchiveError::ReaderUnavailable`] if no reader is registered
    /// - I/O and parse errors from the reader
    pub fn open(&self, path: &Path) -> Result<Box<dyn ArchiveReader>> {
        let format = detect_format(path)?;
        self.open_as(path, format)
    }

    /// Opens `path` with the reader for `format`, skipping detection.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open), minus detection failures.
    pub fn open_as(&self, path: &Path, format: ArchiveFormat) -> Result<Box<dyn ArchiveReader>> {
        if let Some(factory) = self.custom.get(&format) {
            return factory(path);
        }

        match format {
            ArchiveFormat::Zip => Ok(Box::new(zip::ZipReader::open(path)?)),
            ArchiveFormat::Tar => Ok(Box::new(tar::TarReader::open(path, false)?)),
            ArchiveFormat::TarGz => Ok(Box::new(tar::TarReader::open(path, true)?)),
            ArchiveFormat::Gzip => Ok(Box::new(gzip::GzipReader::open(path)?)),
            ArchiveFormat::Rar => Err(ArchiveError::ReaderUnavailable { format }),
        }
    }
}

impl fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderRegistry")
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Whether `path` is the file an archive is being written to.
///
/// `output` is the canonical path of the target as it existed before
/// writing started, if it existed at all.
pub(crate) fn is_output(path: &Path, output: Option<&Path>) -> bool {
    output.is_some_and(|output| path.canonicalize().is_ok_and(|path| path == output))
}

/// Totals collected while writing an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Files added.
    pub files: usize,
    /// Uncompressed bytes read from the sources.
    pub bytes_read: u64,
}
