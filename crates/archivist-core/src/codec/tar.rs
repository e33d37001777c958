//! Tar stream reading, plain or gzip-compressed.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use tar::Archive;
use tar::EntryType;
use tracing::debug;

use super::ArchiveEntry;
use super::ArchiveFormat;
use super::ArchiveReader;
use super::EntryVisitor;
use crate::ArchiveError;
use crate::Result;

/// Reader over a tar or tar.gz file.
///
/// Tar has no index, so every pass (counting, visiting) reopens the file.
/// Only regular files and directories are reported; links and special files
/// are skipped.
#[derive(Debug)]
pub struct TarReader {
    path: PathBuf,
    gzip: bool,
}

impl TarReader {
    /// Prepares a reader for the tar file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path, gzip: bool) -> Result<Self> {
        // Fail early on a missing or unreadable file.
        File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            gzip,
        })
    }

    fn archive(&self) -> Result<Archive<Box<dyn Read>>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let stream: Box<dyn Read> = if self.gzip {
            Box::new(GzDecoder::new(reader))
        } else {
            Box::new(reader)
        };
        Ok(Archive::new(stream))
    }
}

impl ArchiveReader for TarReader {
    fn format(&self) -> ArchiveFormat {
        if self.gzip {
            ArchiveFormat::TarGz
        } else {
            ArchiveFormat::Tar
        }
    }

    fn file_count(&mut self) -> Result<usize> {
        let mut archive = self.archive()?;
        let mut count = 0;
        for entry in archive.entries().map_err(invalid("failed to read TAR entries"))? {
            let entry = entry.map_err(invalid("failed to read TAR entry"))?;
            if is_regular(entry.header().entry_type()) {
                count += 1;
            }
        }
        Ok(count)
    }

    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<()> {
        let mut archive = self.archive()?;
        for entry in archive.entries().map_err(invalid("failed to read TAR entries"))? {
            let mut entry = entry.map_err(invalid("failed to read TAR entry"))?;
            let entry_type = entry.header().entry_type();
            let key = String::from_utf8_lossy(&entry.path_bytes()).into_owned();

            if !entry_type.is_dir() && !is_regular(entry_type) {
                debug!(key = %key, ?entry_type, "skipping unsupported tar entry");
                continue;
            }

            let mut archive_entry = ArchiveEntry::new(key, entry_type.is_dir(), &mut entry);
            visit(&mut archive_entry)?;
        }
        Ok(())
    }
}

fn is_regular(entry_type: EntryType) -> bool {
    entry_type.is_file() || entry_type.is_contiguous()
}

fn invalid(context: &'static str) -> impl Fn(std::io::Error) -> ArchiveError {
    move |e| ArchiveError::InvalidArchive(format!("{context}: {e}"))
}
