//! Unified error types for dawdash
//!
//! Error strategy:
//! - Per-file errors (missing sibling, bad container, broken XML): recoverable,
//!   the file stays in the results with empty metadata
//! - Scan and output errors (missing start directory, unwritable export): fatal
//!
//! Decoders return these errors; the dispatcher turns them into `None` so
//! nothing past a single file ever sees them.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Supported project formats for helpful error messages
pub const SUPPORTED_FORMATS: &str = ".als, .bwproject, .song, .cpr, .xpj";

/// Top-level error type for dawdash operations
#[derive(Debug, Error)]
pub enum DawdashError {
    // =========================================================================
    // Recoverable errors - keep the file, leave its metadata empty
    // =========================================================================
    #[error("File not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    FileNotFound(PathBuf),

    #[error("Archive '{archive}' has no member '{member}'")]
    MemberNotFound { archive: PathBuf, member: String },

    #[error("Unexpected format for '{path}': {reason}")]
    UnexpectedFormat { path: PathBuf, reason: String },

    #[error("Malformed data in '{path}': {reason}")]
    MalformedData { path: PathBuf, reason: String },

    #[error("Permission denied: '{0}'")]
    PermissionDenied(PathBuf),

    #[error("Unsupported project format for '{path}': {format}\n  Supported formats: {SUPPORTED_FORMATS}")]
    UnsupportedFormat { path: PathBuf, format: String },

    // =========================================================================
    // Fatal errors - abort the run
    // =========================================================================
    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for dawdash operations
pub type Result<T> = std::result::Result<T, DawdashError>;

impl DawdashError {
    /// Returns true if this error only concerns one project file
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DawdashError::FileNotFound(_)
                | DawdashError::MemberNotFound { .. }
                | DawdashError::UnexpectedFormat { .. }
                | DawdashError::MalformedData { .. }
                | DawdashError::PermissionDenied(_)
                | DawdashError::UnsupportedFormat { .. }
        )
    }

    /// Returns true if a required file or archive member is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DawdashError::FileNotFound(_) | DawdashError::MemberNotFound { .. }
        )
    }

    /// Map an I/O error on `path` to the matching variant
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => DawdashError::FileNotFound(path),
            std::io::ErrorKind::PermissionDenied => DawdashError::PermissionDenied(path),
            _ => DawdashError::Io(err),
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DawdashError::MalformedData {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn unexpected_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DawdashError::UnexpectedFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!("Directory does not exist: {}", path.parent().map(|p| p.display().to_string()).unwrap_or_default())
            }
            _ => err.to_string(),
        };
        DawdashError::OutputError { path, reason }
    }
}

/// Extension trait for attaching the offending file to foreign errors
pub trait ErrorContext<T> {
    /// Report the error as malformed data in `path`
    fn malformed_in(self, path: &Path) -> Result<T>;
}

impl<T, E: std::fmt::Display> ErrorContext<T> for std::result::Result<T, E> {
    fn malformed_in(self, path: &Path) -> Result<T> {
        self.map_err(|e| DawdashError::MalformedData {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
