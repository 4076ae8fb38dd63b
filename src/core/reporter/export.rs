//! Writes the end-of-run reports.

use super::RunReport;
use crate::error::ReportError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const JSON_REPORT_FILE: &str = "reporte_organizacion.json";
pub const SUMMARY_FILE: &str = "RESUMEN_ORGANIZACION.txt";

const RULE_WIDTH: usize = 50;

/// Where the reports ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub summary: PathBuf,
}

/// Pretty-printed JSON: stats, entries and processing time
pub fn write_json<W: Write>(report: &RunReport, writer: W) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(writer, report)
        .map_err(|e| ReportError::SerializationFailed(e.to_string()))
}

/// Plain-text summary with one block per file
pub fn write_summary<W: Write>(report: &RunReport, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "PHOTO ORGANIZATION SUMMARY")?;
    writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Processed at: {}",
        report.processed_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(writer, "Source: {}", report.source.display())?;
    writeln!(writer, "Destination: {}", report.destination.display())?;
    if report.dry_run {
        writeln!(writer, "Mode: dry run, nothing was copied")?;
    }
    writeln!(writer)?;

    writeln!(writer, "STATISTICS:")?;
    for (name, value) in report.stats.entries() {
        writeln!(writer, "  {}: {}", name, value)?;
    }

    writeln!(writer)?;
    writeln!(writer)?;
    writeln!(writer, "DETAILS PER FILE:")?;
    writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;

    for entry in &report.entries {
        writeln!(writer)?;
        writeln!(writer, "{}", entry.file_name)?;
        writeln!(writer, "   Action: {}", entry.action)?;
        if let Some(destination) = &entry.destination_path {
            writeln!(writer, "   Destination: {}", destination.display())?;
        }
        if let Some(date) = &entry.captured_date {
            writeln!(writer, "   Date: {}", date)?;
        }
        if let Some(reason) = &entry.reason {
            writeln!(writer, "   Reason: {}", reason)?;
        }
    }

    writer.flush()
}

/// Write both reports into `dir`, replacing earlier ones
pub fn write_reports(report: &RunReport, dir: &Path) -> Result<ReportPaths, ReportError> {
    let json = dir.join(JSON_REPORT_FILE);
    let summary = dir.join(SUMMARY_FILE);

    write_file(&json, |file| write_json(report, file))?;
    write_file(&summary, |file| {
        write_summary(report, file).map_err(|e| ReportError::WriteFailed {
            path: summary.clone(),
            source: e,
        })
    })?;

    tracing::info!(json = %json.display(), summary = %summary.display(), "reports written");
    Ok(ReportPaths { json, summary })
}

fn write_file<F>(path: &Path, fill: F) -> Result<(), ReportError>
where
    F: FnOnce(&mut NamedTempFile) -> Result<(), ReportError>,
{
    let io_error = |e: std::io::Error| ReportError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let dir = path.parent().unwrap_or(Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
    fill(&mut temp)?;
    temp.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}
