//! Compress command implementation.

use crate::cli::CompressArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use archivist_core::ArchiveFormat;
use archivist_core::Archiver;
use archivist_core::ArchiverConfig;
use archivist_core::CompressionKind;
use archivist_core::CompressionStrategy;
use archivist_core::codec::detect::detect_by_extension;
use archivist_core::flatten::flatten;
use std::path::Path;
use tracing::debug;

pub fn execute(args: &CompressArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let kind = args
        .kind
        .map_or_else(|| infer_kind(&args.output), CompressionKind::from);
    debug!(%kind, sources = args.sources.len(), "resolved archive kind");

    let config = ArchiverConfig::default()
        .with_compression_level(args.level)
        .with_follow_symlinks(args.follow_symlinks);
    let archiver = Archiver::with_config(config);

    for source in &args.sources {
        if !source.exists() {
            formatter.format_warning(&format!(
                "source '{}' does not exist, nothing added from it",
                source.display()
            ));
        }
    }

    let report = match args.sources.as_slice() {
        [source] => add_archive_context(archiver.compress(&args.output, source, kind), &args.output)?,
        sources => {
            if kind.strategy() == CompressionStrategy::Container {
                bail!(
                    "zip archives take a single SOURCE, got {}\n\
                     HINT: Archive a common parent directory, or use --kind gzip to store files by name.",
                    sources.len()
                );
            }

            let mut files = Vec::new();
            for source in sources {
                files.extend(add_archive_context(
                    flatten(source, args.follow_symlinks),
                    source,
                )?);
            }
            add_archive_context(archiver.compress_files(&args.output, &files), &args.output)?
        }
    };

    formatter.format_creation_result(&report)
}

/// Picks the archive kind from the output file name, zip if unknown.
fn infer_kind(output: &Path) -> CompressionKind {
    match detect_by_extension(output) {
        Ok(ArchiveFormat::Zip) | Err(_) => CompressionKind::Zip,
        Ok(ArchiveFormat::Tar) => CompressionKind::Tar,
        Ok(ArchiveFormat::TarGz | ArchiveFormat::Gzip) => CompressionKind::GZip,
        Ok(ArchiveFormat::Rar) => CompressionKind::Rar,
    }
}
