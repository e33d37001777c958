//! Bare gzip stream reading.
//!
//! A gzip file without a tar payload holds exactly one file. Its name comes
//! from the gzip header when present, otherwise from the archive's own name
//! minus the `.gz` suffix.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use flate2::read::GzDecoder;

use super::ArchiveEntry;
use super::ArchiveFormat;
use super::ArchiveReader;
use super::EntryVisitor;
use crate::Result;

/// Reader over a single-member gzip file.
#[derive(Debug)]
pub struct GzipReader {
    path: PathBuf,
}

impl GzipReader {
    /// Prepares a reader for the gzip file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn fallback_name(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match name.strip_suffix(".gz") {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => format!("{name}.out"),
        }
    }
}

impl ArchiveReader for GzipReader {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Gzip
    }

    fn file_count(&mut self) -> Result<usize> {
        Ok(1)
    }

    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<()> {
        let mut decoder = GzDecoder::new(BufReader::new(File::open(&self.path)?));
        let key = decoder
            .header()
            .and_then(|header| header.filename())
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.fallback_name());

        let mut entry = ArchiveEntry::new(key, false, &mut decoder);
        visit(&mut entry)
    }
}
