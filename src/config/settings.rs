//! Runtime configuration settings

use crate::discovery::ScanOptions;
use crate::error::{DawdashError, Result};
use crate::export::csv::{CsvColumn, DEFAULT_COLUMNS, EXTENDED_COLUMNS};
use crate::types::{DawFormat, ScaleTable};
use crate::view::{SortDirection, SortKey};
use std::path::PathBuf;

/// Runtime settings for a dashboard run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Start directory (or single project file)
    pub input: PathBuf,
    /// Project format to scan for
    pub format: DawFormat,
    /// Export directory; `None` skips the export
    pub output: Option<PathBuf>,
    /// Write JSON next to the CSV
    pub output_json: bool,
    /// CSV columns in order
    pub csv_columns: Vec<CsvColumn>,
    /// Walker options
    pub scan: ScanOptions,
    /// Scale code names
    pub scales: ScaleTable,
    pub sort_key: Option<SortKey>,
    pub sort_direction: SortDirection,
    /// Project-name substring filter
    pub filter: Option<String>,
    /// Number of extraction worker threads
    pub threads: usize,
    /// Show progress bars
    pub show_progress: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Result<Self> {
        let format = DawFormat::from_extension(&cli.format)
            .ok_or_else(|| DawdashError::ConfigError(format!("unknown format '{}'", cli.format)))?;

        let sort_key = cli
            .sort
            .as_deref()
            .map(|key| {
                SortKey::parse(key)
                    .ok_or_else(|| DawdashError::ConfigError(format!("unknown sort key '{}'", key)))
            })
            .transpose()?;

        if cli.threads == Some(0) {
            return Err(DawdashError::ConfigError("thread count must be at least 1".to_string()));
        }

        let mut scan = ScanOptions::default();
        scan.excluded_dirs.extend(cli.exclude.iter().cloned());
        scan.descend_into_projects = cli.descend_into_projects;

        let csv_columns = if cli.extended_csv {
            EXTENDED_COLUMNS.to_vec()
        } else {
            DEFAULT_COLUMNS.to_vec()
        };

        Ok(Self {
            input: cli.input.clone(),
            format,
            output: cli.output.clone(),
            output_json: cli.json,
            csv_columns,
            scan,
            sort_key,
            sort_direction: if cli.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
            filter: cli.filter.clone().filter(|f| !f.is_empty()),
            threads: cli.threads.unwrap_or_else(default_threads),
            show_progress: !cli.quiet,
            ..Self::default()
        })
    }
}

fn default_threads() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            format: DawFormat::Ableton,
            output: None,
            output_json: false,
            csv_columns: DEFAULT_COLUMNS.to_vec(),
            scan: ScanOptions::default(),
            scales: ScaleTable::default(),
            sort_key: None,
            sort_direction: SortDirection::Ascending,
            filter: None,
            threads: default_threads(),
            show_progress: true,
        }
    }
}
