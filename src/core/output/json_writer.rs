//! JSON report writer.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use super::csv_writer::ensure_parent;
use crate::core::report::Report;
use crate::error::{ChatcatError, Result};

/// Path of the report file for `prefix`: `{prefix}_report.json`.
pub fn report_path(prefix: &Path) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push("_report.json");
    PathBuf::from(name)
}

/// Renders a report as pretty-printed JSON.
pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes `{prefix}_report.json` and returns its path.
pub fn write_report_json(report: &Report, prefix: &Path) -> Result<PathBuf> {
    let path = report_path(prefix);
    let json = to_json(report)?;

    ensure_parent(&path)?;
    let mut file = File::create(&path).map_err(|e| ChatcatError::output(&path, e))?;
    file.write_all(json.as_bytes())
        .map_err(|e| ChatcatError::output(&path, e))?;

    info!(path = %path.display(), "wrote report");
    Ok(path)
}
