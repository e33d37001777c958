//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use archivist_core::Archiver;
use archivist_core::ArchiverConfig;
use std::env;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let config = ArchiverConfig::default().with_traversal_policy(args.on_traversal.into());
    let mut archiver = Archiver::with_config(config);

    // Use progress bar if TTY is detected (not quiet, not JSON, is terminal)
    let progress = (show_progress && CliProgress::should_show()).then(|| CliProgress::new("Extracting"));
    if let Some(progress) = &progress {
        progress.attach(&mut archiver);
    }

    let report = add_archive_context(archiver.uncompress(&args.archive, &output_dir), &args.archive)?;
    drop(progress);

    formatter.format_extraction_result(&report)
}
