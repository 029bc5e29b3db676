//! JSON export for interoperability with other tools

use super::write_atomically;
use crate::error::{DawdashError, Result};
use crate::types::{DawFormat, ProjectRecord, ScaleInfo, TrackCounts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the JSON export inside the output directory
pub const JSON_FILE_NAME: &str = "dawdash.json";

/// JSON output schema version
const SCHEMA_VERSION: &str = "1.0";

/// Top-level JSON output structure
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardJson {
    /// Schema version for forward compatibility
    pub version: String,
    pub metadata: ExportMetadata,
    pub projects: Vec<ProjectJson>,
}

/// Export metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// dawdash version that generated this file
    pub generator_version: String,
    /// Timestamp of export
    pub exported_at: String,
    pub project_count: usize,
}

/// JSON representation of one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectJson {
    pub project_name: String,
    /// Name stored inside the project file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub path: String,
    pub format: DawFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_info: Option<ScaleInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_counts: Option<TrackCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// False when the file could not be decoded
    pub readable: bool,
}

impl From<&ProjectRecord> for ProjectJson {
    fn from(record: &ProjectRecord) -> Self {
        Self {
            project_name: record.project_name(),
            title: record.title().map(str::to_string),
            path: record.path.to_string_lossy().to_string(),
            format: record.format,
            date: record.date,
            tempo: record.tempo(),
            scale_info: record.scale_info().cloned(),
            track_counts: record.track_counts(),
            author: record.metadata.as_ref().and_then(|m| m.author.clone()),
            readable: record.metadata.is_some(),
        }
    }
}

/// Write `records` as `dawdash.json` into `output_dir`
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
pub fn write_json(records: &[ProjectRecord], output_dir: &Path) -> Result<PathBuf> {
    let output_path = output_dir.join(JSON_FILE_NAME);

    let output = DashboardJson {
        version: SCHEMA_VERSION.to_string(),
        metadata: ExportMetadata {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now().to_rfc3339(),
            project_count: records.len(),
        },
        projects: records.iter().map(ProjectJson::from).collect(),
    };

    write_atomically(&output_path, |writer| {
        serde_json::to_writer_pretty(writer, &output)?;
        Ok(())
    })?;

    info!("Wrote {} projects to {}", records.len(), output_path.display());

    Ok(output_path)
}

/// Read a previous JSON export back
pub fn read_json(path: &Path) -> Result<DashboardJson> {
    let file = File::open(path).map_err(|e| DawdashError::from_io(path, e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| DawdashError::malformed(path, e.to_string()))
}
