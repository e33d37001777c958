//! ZIP container reading and writing.

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::ArchiveEntry;
use super::ArchiveFormat;
use super::ArchiveReader;
use super::EntryVisitor;
use super::WriteStats;
use super::is_output;
use crate::ArchiveError;
use crate::Result;

/// Reader over a ZIP file.
pub struct ZipReader {
    archive: ZipArchive<BufReader<File>>,
}

impl ZipReader {
    /// Opens the ZIP file at `path` and reads its central directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not a valid ZIP.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(BufReader::new(file))?;
        Ok(Self { archive })
    }
}

impl ArchiveReader for ZipReader {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Zip
    }

    fn file_count(&mut self) -> Result<usize> {
        let count = self
            .archive
            .file_names()
            .filter(|name| !name.ends_with(['/', '\\']))
            .count();
        Ok(count)
    }

    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> Result<()> {
        for index in 0..self.archive.len() {
            let mut file = self.archive.by_index(index)?;
            let key = file.name().to_string();
            let is_directory = file.is_dir();
            let mut entry = ArchiveEntry::new(key, is_directory, &mut file);
            visit(&mut entry)?;
        }
        Ok(())
    }
}

/// Writes every file below `source` into a new deflate-compressed ZIP at
/// `target`.
///
/// Entry names are relative to `source` and use `/`. A single file is
/// stored under its own name; a missing `source` produces an empty archive.
/// Only files are stored, so empty directories are not preserved.
///
/// # Errors
///
/// Returns an error if `target` cannot be created, a source file cannot be
/// read, or the tree cannot be walked.
pub fn write_directory(
    target: &Path,
    source: &Path,
    level: u8,
    follow_symlinks: bool,
) -> Result<WriteStats> {
    // Walk before creating `target` so a target inside `source` is never
    // picked up, and drop an older copy of it left by a previous run.
    let sources = collect_sources(source, follow_symlinks)?;
    let previous = target.canonicalize().ok();

    let file = File::create(target)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i64::from(level)));

    let mut stats = WriteStats::default();
    for (path, name) in sources {
        if is_output(&path, previous.as_deref()) {
            debug!(path = %path.display(), "skipping the archive being written");
            continue;
        }
        stats.bytes_read += add_file(&mut zip, &path, name, options)?;
        stats.files += 1;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;

    debug!(target = %target.display(), files = stats.files, "zip container written");
    Ok(stats)
}

/// Files below `source` paired with their entry names, in file-name order.
fn collect_sources(source: &Path, follow_symlinks: bool) -> Result<Vec<(PathBuf, String)>> {
    if source.is_file() {
        let name = source
            .file_name()
            .map(Path::new)
            .ok_or_else(|| {
                ArchiveError::Io(io::Error::other(format!(
                    "cannot determine filename for {}",
                    source.display()
                )))
            })
            .and_then(entry_name)?;
        return Ok(vec![(source.to_path_buf(), name)]);
    }

    if !source.is_dir() {
        debug!(source = %source.display(), "source missing, writing empty archive");
        return Ok(Vec::new());
    }

    let walker = WalkDir::new(source)
        .follow_links(follow_symlinks)
        .sort_by_file_name();
    let mut sources = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(source).map_err(|e| {
            ArchiveError::Io(io::Error::other(format!(
                "cannot compute entry name for {}: {e}",
                entry.path().display()
            )))
        })?;
        let name = entry_name(relative)?;
        sources.push((entry.into_path(), name));
    }
    Ok(sources)
}

fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &Path,
    name: String,
    options: SimpleFileOptions,
) -> Result<u64> {
    let mut file = File::open(path)?;
    zip.start_file(name, options)?;
    let bytes = io::copy(&mut file, zip)?;
    Ok(bytes)
}

/// Converts a relative path into a `/`-separated ZIP entry name.
fn entry_name(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| {
            ArchiveError::Io(io::Error::other(format!(
                "path is not valid UTF-8: {}",
                relative.display()
            )))
        })?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}
