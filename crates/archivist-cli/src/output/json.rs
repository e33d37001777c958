//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use archivist_core::CreationReport;
use archivist_core::ExtractionReport;
use serde::Serialize;
use std::io;
use std::io::Write;
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct CreationOutput {
    output_path: String,
    strategy: String,
    files_added: usize,
    bytes_read: u64,
    bytes_compressed: u64,
    compression_ratio: f64,
    duration_ms: u128,
}

#[derive(Serialize)]
struct ExtractionOutput {
    files_extracted: usize,
    directories_skipped: usize,
    bytes_written: u64,
    duration_ms: u128,
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct ListingOutput {
    archive: String,
    total: usize,
    entries: Vec<String>,
}

impl OutputFormatter for JsonFormatter {
    fn format_creation_result(&self, report: &CreationReport) -> Result<()> {
        let data = CreationOutput {
            output_path: report.output.display().to_string(),
            strategy: report.strategy.to_string(),
            files_added: report.files_added,
            bytes_read: report.bytes_read,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            duration_ms: report.duration.as_millis(),
        };

        Self::output(&JsonOutput::success("compress", data))
    }

    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        let data = ExtractionOutput {
            files_extracted: report.files_extracted,
            directories_skipped: report.directories_skipped,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
        };

        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_listing(&self, archive: &Path, names: &[String]) -> Result<()> {
        let data = ListingOutput {
            archive: archive.display().to_string(),
            total: names.len(),
            entries: names.to_vec(),
        };

        Self::output(&JsonOutput::success("list", data))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        // Warnings go to stderr so stdout stays a single JSON document.
        if let Ok(json) = serde_json::to_string(&output) {
            let _ = writeln!(io::stderr(), "{json}");
        }
    }
}
