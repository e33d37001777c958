//! Gzip-compressed tar stream writing.
//!
//! The stream strategy has no directory structure: every file is appended
//! under its bare file name, in the order given.

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::Builder;
use tracing::debug;

use super::WriteStats;
use crate::ArchiveError;
use crate::Result;

/// Writer appending files to a gzip-compressed tar stream.
///
/// Call [`finish`](Self::finish) to write the end-of-archive marker and the
/// gzip trailer; dropping the writer without it leaves a truncated file.
pub struct StreamWriter {
    builder: Builder<GzEncoder<BufWriter<File>>>,
    stats: WriteStats,
}

impl StreamWriter {
    /// Creates `target`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` cannot be created.
    pub fn create(target: &Path, level: u8) -> Result<Self> {
        let file = BufWriter::new(File::create(target)?);
        let encoder = GzEncoder::new(file, Compression::new(u32::from(level)));
        let mut builder = Builder::new(encoder);
        builder.follow_symlinks(true);
        Ok(Self {
            builder,
            stats: WriteStats::default(),
        })
    }

    /// Appends the file at `source` as an entry named `name` and returns
    /// its size.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` cannot be read or the entry cannot be
    /// written.
    pub fn append(&mut self, name: &str, source: &Path) -> Result<u64> {
        let mut file = File::open(source)?;
        let size = file.metadata()?.len();
        self.builder.append_file(name, &mut file).map_err(|e| {
            ArchiveError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to append {}: {e}", source.display()),
            ))
        })?;

        self.stats.files += 1;
        self.stats.bytes_read += size;
        debug!(entry = name, size, "appended stream entry");
        Ok(size)
    }

    /// Totals so far.
    #[must_use]
    pub const fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Completes the tar stream and the gzip trailer.
    ///
    /// # Errors
    ///
    /// Returns an error if the trailing data cannot be written.
    pub fn finish(self) -> Result<WriteStats> {
        let encoder = self.builder.into_inner()?;
        let mut file = encoder.finish()?;
        file.flush()?;
        Ok(self.stats)
    }
}

impl std::fmt::Debug for StreamWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamWriter")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
