//! # tally-report
//!
//! Writes incident-type records as a pretty-printed JSON array plus a CSV
//! file next to it, and discovered categories as a JSON list of
//! `[label, count]` pairs.

mod csv;
mod error;

pub use csv::{CSV_HEADER, escape_field, render_csv};
pub use error::ReportError;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tally_core::{CategoryCount, IncidentTypeRecord};

/// Suffix format appended to report stems, e.g. `_20240131_235959`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Report file stem used when the output is a directory.
pub const DEFAULT_REPORT_STEM: &str = "incident_analysis";

fn is_directory(path: &Path) -> bool {
    path.is_dir() || path.as_os_str().to_string_lossy().ends_with(std::path::is_separator)
}

/// Where a report was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

impl ReportPaths {
    /// Derive both paths from the requested JSON path.
    ///
    /// The CSV shares the stem with a `.csv` extension. With a timestamp,
    /// both stems get a `_YYYYmmdd_HHMMSS` suffix.
    ///
    /// An existing directory, or a path ending in a separator, receives
    /// `incident_analysis.json` and `incident_analysis.csv`.
    #[must_use]
    pub fn for_output(output: &Path, timestamp: Option<NaiveDateTime>) -> Self {
        let (dir, stem) = if is_directory(output) {
            (output, DEFAULT_REPORT_STEM.to_string())
        } else {
            let stem = output
                .file_stem()
                .map_or_else(|| DEFAULT_REPORT_STEM.into(), |s| s.to_string_lossy().into_owned());
            (output.parent().unwrap_or_else(|| Path::new("")), stem)
        };
        let stem = match timestamp {
            Some(ts) => format!("{stem}_{}", ts.format(TIMESTAMP_FORMAT)),
            None => stem,
        };
        Self {
            json: dir.join(format!("{stem}.json")),
            csv: dir.join(format!("{stem}.csv")),
        }
    }
}

/// Write `records` as JSON and CSV.
///
/// # Errors
///
/// Returns [`ReportError`] if a directory or file cannot be written. Errors
/// are also logged.
pub fn write_report(
    records: &[IncidentTypeRecord],
    output: &Path,
    timestamp: Option<NaiveDateTime>,
) -> Result<ReportPaths, ReportError> {
    let paths = ReportPaths::for_output(output, timestamp);
    let json = serde_json::to_string_pretty(records)?;
    write_file(&paths.json, json.as_bytes())?;
    tracing::info!(path = %paths.json.display(), records = records.len(), "wrote JSON report");
    write_file(&paths.csv, render_csv(records).as_bytes())?;
    tracing::info!(path = %paths.csv.display(), "wrote CSV report");
    Ok(paths)
}

/// Write discovered categories as a JSON list of `[label, count]` pairs.
///
/// # Errors
///
/// Returns [`ReportError`] if the file cannot be written.
pub fn write_discovered_terms(terms: &[CategoryCount], output: &Path) -> Result<(), ReportError> {
    let pairs: Vec<(&str, u64)> = terms.iter().map(|t| (t.label.as_str(), t.count)).collect();
    let json = serde_json::to_string_pretty(&pairs)?;
    write_file(output, json.as_bytes())?;
    tracing::info!(path = %output.display(), terms = terms.len(), "wrote discovered terms");
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    let io_err = |source| {
        tracing::error!(path = %path.display(), error = %source, "report write failed");
        ReportError::Io {
            path: path.to_path_buf(),
            source,
        }
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, contents).map_err(io_err)
}
