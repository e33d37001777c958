//! Compression strategy selection.
//!
//! A [`CompressionKind`] picks one of two strategies:
//!
//! - [`CompressionStrategy::Container`] (zip): the zip writer walks the
//!   source tree itself and keeps relative paths.
//! - [`CompressionStrategy::Stream`] (everything else): the source is
//!   flattened and every file is appended to a gzip-compressed tar stream
//!   under its base name. Directory structure is lost.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use tracing::debug;

use crate::ArchiveError;
use crate::Result;
use crate::codec::WriteStats;
use crate::codec::is_output;
use crate::codec::stream::StreamWriter;
use crate::codec::zip;
use crate::config::ArchiverConfig;
use crate::flatten::flatten;
use crate::report::CreationReport;

/// Requested archive kind for compression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CompressionKind {
    /// No particular kind; uses the stream strategy.
    Unknown,
    /// ZIP container.
    #[default]
    Zip,
    /// RAR. There is no RAR writer, so this uses the stream strategy.
    Rar,
    /// Gzip-compressed stream.
    GZip,
    /// Tar. Written as a gzip-compressed stream.
    Tar,
}

impl CompressionKind {
    /// Strategy used to write archives of this kind.
    #[must_use]
    pub const fn strategy(self) -> CompressionStrategy {
        match self {
            Self::Zip => CompressionStrategy::Container,
            Self::Unknown | Self::Rar | Self::GZip | Self::Tar => CompressionStrategy::Stream,
        }
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Zip => "zip",
            Self::Rar => "rar",
            Self::GZip => "gzip",
            Self::Tar => "tar",
        };
        f.write_str(name)
    }
}

impl FromStr for CompressionKind {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "unknown" => Ok(Self::Unknown),
            "zip" => Ok(Self::Zip),
            "rar" => Ok(Self::Rar),
            "gzip" | "gz" => Ok(Self::GZip),
            "tar" => Ok(Self::Tar),
            _ => Err(ArchiveError::UnsupportedFormat),
        }
    }
}

/// How an archive is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionStrategy {
    /// Structured container built from the directory tree.
    Container,
    /// Flat stream of files named by their base name.
    Stream,
}

impl fmt::Display for CompressionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container => f.write_str("container"),
            Self::Stream => f.write_str("stream"),
        }
    }
}

/// Compresses `source` into `target` using the strategy for `kind`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, `target` cannot be
/// written or a source file cannot be read.
pub fn compress(
    target: &Path,
    source: &Path,
    kind: CompressionKind,
    config: &ArchiverConfig,
) -> Result<CreationReport> {
    config.validate()?;
    let start = Instant::now();
    let strategy = kind.strategy();
    debug!(
        target = %target.display(),
        source = %source.display(),
        %kind,
        %strategy,
        "compressing"
    );

    let mut report = CreationReport::new(target.to_path_buf(), strategy);
    let stats = match strategy {
        CompressionStrategy::Container => zip::write_directory(
            target,
            source,
            config.compression_level,
            config.follow_symlinks,
        )?,
        CompressionStrategy::Stream => {
            let files = flatten(source, config.follow_symlinks)?;
            write_stream(target, &files, config)?
        }
    };

    report.files_added = stats.files;
    report.bytes_read = stats.bytes_read;
    report.bytes_compressed = std::fs::metadata(target)?.len();
    report.duration = start.elapsed();
    Ok(report)
}

/// Compresses an explicit list of files into a stream archive at `target`.
///
/// Entries keep the order of `files` and are named by base name only.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, `target` cannot be
/// written or one of the files cannot be read.
pub fn compress_files(
    target: &Path,
    files: &[PathBuf],
    config: &ArchiverConfig,
) -> Result<CreationReport> {
    config.validate()?;
    let start = Instant::now();
    debug!(target = %target.display(), files = files.len(), "compressing file list");

    let stats = write_stream(target, files, config)?;

    let mut report = CreationReport::new(target.to_path_buf(), CompressionStrategy::Stream);
    report.files_added = stats.files;
    report.bytes_read = stats.bytes_read;
    report.bytes_compressed = std::fs::metadata(target)?.len();
    report.duration = start.elapsed();
    Ok(report)
}

fn write_stream(
    target: &Path,
    files: &[PathBuf],
    config: &ArchiverConfig,
) -> Result<WriteStats> {
    let previous = target.canonicalize().ok();
    let mut writer = StreamWriter::create(target, config.compression_level)?;
    for file in files {
        if is_output(file, previous.as_deref()) {
            debug!(path = %file.display(), "skipping the archive being written");
            continue;
        }
        let name = base_name(file)?;
        writer.append(&name, file)?;
    }
    writer.finish()
}

fn base_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ArchiveError::Io(std::io::Error::other(format!(
                "cannot determine filename for {}",
                path.display()
            )))
        })
}
