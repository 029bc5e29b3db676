//! Project file discovery

use crate::error::{DawdashError, Result};
use crate::types::DawFormat;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Folders DAWs create next to a project that never hold projects themselves
pub const DAW_EXCLUDED_DIRS: &[&str] = &["Backup", "Samples", "auto-backups"];

/// Windows system folders not worth walking
///
/// `<Username>` matches any single path component.
pub const SYSTEM_EXCLUDED_DIRS: &[&str] = &[
    "Windows",
    "Program Files",
    "Program Files (x86)",
    "ProgramData",
    "Users\\All Users",
    "Users\\Default",
    "Users\\Public",
    "Users\\DefaultAppPool",
    "Users\\<Username>\\AppData",
    "$Recycle.Bin",
    "Windows\\Temp",
    "Windows\\Prefetch",
    "Windows\\SoftwareDistribution",
    "System Volume Information",
    "MSOCache",
    "Recovery",
    "$WINDOWS.~BT",
    "$SysReset",
    "Windows\\Installer",
    "Windows\\WinSxS",
    "Windows\\Logs",
];

const ANY_COMPONENT: &str = "<Username>";

/// Files above this size are skipped by default (100 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Walker options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directory names or `\`/`/`-separated path suffixes to skip
    pub excluded_dirs: Vec<String>,
    /// Keep walking below a folder that already holds a project file
    pub descend_into_projects: bool,
    /// Skip project files larger than this
    pub max_file_size: Option<u64>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            excluded_dirs: DAW_EXCLUDED_DIRS
                .iter()
                .chain(SYSTEM_EXCLUDED_DIRS)
                .map(|d| d.to_string())
                .collect(),
            descend_into_projects: false,
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
        }
    }
}

impl ScanOptions {
    /// Check whether a directory path matches an exclusion entry
    pub fn is_excluded(&self, dir: &Path) -> bool {
        let components: Vec<String> = dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();

        self.excluded_dirs
            .iter()
            .any(|pattern| suffix_matches(&components, pattern))
    }
}

/// Match `pattern`'s components against the tail of `components`
fn suffix_matches(components: &[String], pattern: &str) -> bool {
    let parts: Vec<&str> = pattern
        .split(['\\', '/'])
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() || parts.len() > components.len() {
        return false;
    }

    let tail = &components[components.len() - parts.len()..];
    tail.iter()
        .zip(&parts)
        .all(|(name, part)| *part == ANY_COMPONENT || name.eq_ignore_ascii_case(part))
}

/// Shared cancellation switch, checked between walker entries and files
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A project file found by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredProject {
    pub path: PathBuf,
    pub format: DawFormat,
    pub size_bytes: u64,
}

/// Scan a start directory (or single file) for projects of one format
///
/// Directories are walked depth-first, files before subdirectories and each
/// group by name, so results come out in a stable order. A cancelled scan
/// returns what it found so far.
pub fn scan(
    root: &Path,
    format: DawFormat,
    options: &ScanOptions,
    cancel: &CancelFlag,
) -> Result<Vec<DiscoveredProject>> {
    if !root.exists() {
        return Err(DawdashError::FileNotFound(root.to_path_buf()));
    }

    if root.is_file() {
        // Single file mode
        return match try_discover(root, format, options) {
            Some(project) => Ok(vec![project]),
            None => Err(DawdashError::UnsupportedFormat {
                path: root.to_path_buf(),
                format: root
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            }),
        };
    }

    let mut projects = Vec::new();
    let mut project_dirs: HashSet<PathBuf> = HashSet::new();

    let mut walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter();

    loop {
        if cancel.is_cancelled() {
            info!("Scan cancelled after {} projects", projects.len());
            break;
        }

        let entry = match walker.next() {
            None => break,
            Some(Ok(entry)) => entry,
            Some(Err(e)) => {
                warn!("Skipping unreadable path: {}", e);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            if entry.depth() > 0 && should_skip_dir(&entry, options, &project_dirs) {
                walker.skip_current_dir();
            }
            continue;
        }

        if let Some(project) = try_discover(entry.path(), format, options) {
            debug!("Discovered: {}", project.path.display());
            if let Some(parent) = project.path.parent() {
                project_dirs.insert(parent.to_path_buf());
            }
            projects.push(project);
        }
    }

    info!("Discovered {} {} projects", projects.len(), format);

    if projects.is_empty() && !cancel.is_cancelled() {
        warn!("No .{} files found in {}", format.extension(), root.display());
    }

    Ok(projects)
}

fn should_skip_dir(entry: &DirEntry, options: &ScanOptions, project_dirs: &HashSet<PathBuf>) -> bool {
    let path = entry.path();
    if options.is_excluded(path) {
        debug!("Excluded: {}", path.display());
        return true;
    }
    if !options.descend_into_projects {
        if let Some(parent) = path.parent() {
            if project_dirs.contains(parent) {
                debug!("Not descending into project folder child {}", path.display());
                return true;
            }
        }
    }
    false
}

/// Try to create a DiscoveredProject if the path carries the wanted extension
fn try_discover(path: &Path, format: DawFormat, options: &ScanOptions) -> Option<DiscoveredProject> {
    if !format.matches_path(path) {
        return None;
    }

    let size_bytes = match std::fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            warn!("Cannot stat {}: {}", path.display(), e);
            return None;
        }
    };

    if let Some(max) = options.max_file_size {
        if size_bytes > max {
            warn!("Skipping {} ({} bytes exceeds the size limit)", path.display(), size_bytes);
            return None;
        }
    }

    Some(DiscoveredProject {
        path: path.to_path_buf(),
        format,
        size_bytes,
    })
}
