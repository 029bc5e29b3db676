//! Pipeline orchestration
//!
//! Coordinates project discovery, parallel metadata extraction, ordering and
//! export.

use crate::config::Settings;
use crate::discovery::{self, CancelFlag, DiscoveredProject};
use crate::error::{DawdashError, Result};
use crate::export;
use crate::extract::Extractor;
use crate::types::ProjectRecord;
use crate::view;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Pipeline result summary
#[derive(Debug, Default)]
pub struct PipelineResult {
    /// Project files found by the walker
    pub total_files: usize,
    /// Files whose metadata could be read
    pub extracted: usize,
    /// Files that could not be decoded (kept with empty metadata)
    pub failed: usize,
    /// Files skipped because the run was cancelled
    pub cancelled: usize,
    /// Records after filtering and sorting
    pub records: Vec<ProjectRecord>,
    pub csv_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

/// Run the full dashboard pipeline
pub fn run(settings: &Settings) -> Result<PipelineResult> {
    run_with_cancel(settings, &CancelFlag::new())
}

/// Run the pipeline with an externally controlled cancel flag
pub fn run_with_cancel(settings: &Settings, cancel: &CancelFlag) -> Result<PipelineResult> {
    let pipeline_start = Instant::now();

    let pool = build_thread_pool(settings.threads)?;

    // Phase 1: Discovery
    let discovery_start = Instant::now();
    info!("Scanning {} for .{} files...", settings.input.display(), settings.format.extension());
    let projects = discovery::scan(&settings.input, settings.format, &settings.scan, cancel)?;

    if projects.is_empty() {
        info!("No .{} projects found", settings.format.extension());
        let mut result = PipelineResult::default();
        // An empty scan still leaves a header-only CSV behind
        if let (Some(output_dir), false) = (&settings.output, cancel.is_cancelled()) {
            let (csv_path, json_path) = export_results(&[], settings, output_dir)?;
            result.csv_path = Some(csv_path);
            result.json_path = json_path;
        }
        return Ok(result);
    }

    info!(
        "Found {} projects in {:.2}s",
        projects.len(),
        discovery_start.elapsed().as_secs_f64()
    );

    // Phase 2: Extraction
    let extract_start = Instant::now();
    let extractor = Extractor::new(settings.scales.clone());
    let (mut records, stats) = pool.install(|| extract_all(&projects, &extractor, settings, cancel));
    info!(
        "Extraction completed in {:.2}s ({} read, {} unreadable)",
        extract_start.elapsed().as_secs_f64(),
        stats.extracted,
        stats.failed
    );

    // Phase 3: Ordering
    records.sort_by(|a, b| a.path.cmp(&b.path));
    if let Some(term) = &settings.filter {
        records = view::filter_by_name(records, term);
        debug!("{} projects match filter '{}'", records.len(), term);
    }
    if let Some(key) = settings.sort_key {
        view::sort_records(&mut records, key, settings.sort_direction);
    }

    // Phase 4: Export
    let mut result = PipelineResult {
        total_files: projects.len(),
        extracted: stats.extracted,
        failed: stats.failed,
        cancelled: stats.cancelled,
        ..Default::default()
    };

    if let Some(output_dir) = &settings.output {
        let export_start = Instant::now();
        let (csv_path, json_path) = export_results(&records, settings, output_dir)?;
        result.csv_path = Some(csv_path);
        result.json_path = json_path;
        info!("Export completed in {:.2}s", export_start.elapsed().as_secs_f64());
    }

    info!("Total pipeline time: {:.2}s", pipeline_start.elapsed().as_secs_f64());

    result.records = records;
    Ok(result)
}

/// Build a dedicated Rayon pool for the extraction phase
fn build_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| DawdashError::ConfigError(format!("Failed to configure thread pool: {}", e)))?;
    debug!("Configured thread pool with {} threads", num_threads);
    Ok(pool)
}

/// Extraction statistics
struct ExtractStats {
    extracted: usize,
    failed: usize,
    cancelled: usize,
}

/// Extract every project in parallel, keeping walker order
fn extract_all(
    projects: &[DiscoveredProject],
    extractor: &Extractor,
    settings: &Settings,
    cancel: &CancelFlag,
) -> (Vec<ProjectRecord>, ExtractStats) {
    let progress_bar = if settings.show_progress {
        let pb = ProgressBar::new(projects.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let extracted = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let cancelled = AtomicUsize::new(0);

    let records: Vec<ProjectRecord> = projects
        .par_iter()
        .filter_map(|project| {
            if cancel.is_cancelled() {
                cancelled.fetch_add(1, Ordering::Relaxed);
                return None;
            }

            let metadata = extractor.extract(&project.path, project.format);
            if metadata.is_some() {
                extracted.fetch_add(1, Ordering::Relaxed);
            } else {
                failed.fetch_add(1, Ordering::Relaxed);
            }

            let mut record = ProjectRecord::new(project.path.clone(), project.format, metadata);
            record.date = modified_date(&project.path);

            if let Some(ref pb) = progress_bar {
                pb.inc(1);
                pb.set_message(format!(
                    "{}",
                    project.path.file_name().unwrap_or_default().to_string_lossy()
                ));
            }
            Some(record)
        })
        .collect();

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Extraction complete");
    }

    let stats = ExtractStats {
        extracted: extracted.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
        cancelled: cancelled.load(Ordering::Relaxed),
    };

    if stats.cancelled > 0 {
        info!("Cancelled before {} files were read", stats.cancelled);
    }

    (records, stats)
}

/// Modification time of a project file
fn modified_date(path: &Path) -> Option<DateTime<Utc>> {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(time) => Some(DateTime::<Utc>::from(time)),
        Err(e) => {
            debug!("No modification time for {}: {}", path.display(), e);
            None
        }
    }
}

/// Write the CSV and, if enabled, the JSON export
fn export_results(
    records: &[ProjectRecord],
    settings: &Settings,
    output_dir: &Path,
) -> Result<(PathBuf, Option<PathBuf>)> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| DawdashError::output_error(output_dir, e))?;

    let csv_path = export::write_csv(records, &settings.csv_columns, output_dir)?;

    let json_path = if settings.output_json {
        Some(export::write_json(records, output_dir)?)
    } else {
        None
    };

    Ok((csv_path, json_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DawFormat;
    use std::fs;
    use tempfile::TempDir;

    fn settings(input: &Path, format: DawFormat) -> Settings {
        Settings {
            input: input.to_path_buf(),
            format,
            threads: 2,
            show_progress: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_run_orders_by_path_and_counts() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("b")).unwrap();
        fs::create_dir_all(temp.path().join("a")).unwrap();
        fs::write(temp.path().join("b/Two.xpj"), "<Project><BPM>100</BPM></Project>").unwrap();
        fs::write(temp.path().join("a/One.xpj"), "<Project><BPM>90</BPM></Project>").unwrap();
        fs::write(temp.path().join("a/Broken.xpj"), "<Project>").unwrap();

        let result = run(&settings(temp.path(), DawFormat::AkaiMpc)).unwrap();
        assert_eq!(result.total_files, 3);
        assert_eq!(result.extracted, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.cancelled, 0);

        let names: Vec<String> = result.records.iter().map(|r| r.project_name()).collect();
        assert_eq!(names, vec!["Broken", "One", "Two"]);
        assert!(result.records.iter().all(|r| r.date.is_some()));
        assert!(result.records[0].metadata.is_none());
        assert!(result.csv_path.is_none());
    }

    #[test]
    fn test_run_filter_and_sort() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Demo Fast.xpj"), "<Project><BPM>170</BPM></Project>").unwrap();
        fs::write(temp.path().join("Demo Slow.xpj"), "<Project><BPM>70</BPM></Project>").unwrap();
        fs::write(temp.path().join("Final.xpj"), "<Project><BPM>120</BPM></Project>").unwrap();

        let settings = Settings {
            filter: Some("demo".to_string()),
            sort_key: Some(view::SortKey::Tempo),
            ..settings(temp.path(), DawFormat::AkaiMpc)
        };
        let result = run(&settings).unwrap();
        let tempos: Vec<Option<f64>> = result.records.iter().map(|r| r.tempo()).collect();
        assert_eq!(tempos, vec![Some(70.0), Some(170.0)]);
    }

    #[test]
    fn test_run_exports() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("projects");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("Beat.xpj"), "<Project><BPM>95</BPM></Project>").unwrap();

        let settings = Settings {
            output: Some(temp.path().join("out")),
            output_json: true,
            ..settings(&input, DawFormat::AkaiMpc)
        };
        let result = run(&settings).unwrap();
        assert!(result.csv_path.unwrap().exists());
        assert!(result.json_path.unwrap().exists());
    }

    #[test]
    fn test_empty_scan_writes_header_only_csv() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("empty");
        fs::create_dir_all(&input).unwrap();

        let settings = Settings {
            output: Some(temp.path().join("out")),
            ..settings(&input, DawFormat::Ableton)
        };
        let result = run(&settings).unwrap();
        assert_eq!(result.total_files, 0);

        let csv_path = result.csv_path.unwrap();
        let content = fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["projectName,tempo,date,path"]);
        assert!(result.json_path.is_none());
    }

    #[test]
    fn test_cancelled_run_reads_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Beat.xpj"), "<Project/>").unwrap();

        let cancel = CancelFlag::new();
        cancel.cancel();
        let result = run_with_cancel(&settings(temp.path(), DawFormat::AkaiMpc), &cancel).unwrap();
        assert_eq!(result.extracted, 0);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_missing_input_is_error() {
        let settings = settings(Path::new("/no/such/dir"), DawFormat::Ableton);
        assert!(matches!(run(&settings), Err(DawdashError::FileNotFound(_))));
    }
}
