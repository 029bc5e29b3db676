//! CSV and JSON export

pub mod csv;
pub mod json;

pub use self::csv::{write_csv, CsvColumn, CSV_FILE_NAME};
pub use self::json::{read_json, write_json, JSON_FILE_NAME};

use crate::error::{DawdashError, Result};
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write a file through a sibling temp file and a rename
///
/// The temp file lives in the same directory so the rename stays on one
/// filesystem. On any failure the temp file is removed and the target is
/// left untouched.
pub(crate) fn write_atomically<F>(output_path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let temp_path = temp_path_for(output_path);

    let file = File::create(&temp_path).map_err(|e| DawdashError::OutputError {
        path: output_path.to_path_buf(),
        reason: format!("Failed to create temp file: {}", e),
    })?;

    let mut writer = BufWriter::new(file);
    let written = write(&mut writer).and_then(|()| writer.flush());
    drop(writer);

    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(DawdashError::OutputError {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        });
    }

    std::fs::rename(&temp_path, output_path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        DawdashError::OutputError {
            path: output_path.to_path_buf(),
            reason: format!("Failed to finalize file: {}", e),
        }
    })
}

fn temp_path_for(output_path: &Path) -> PathBuf {
    let mut name = OsString::from(output_path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_replaces_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out.txt");
        std::fs::write(&target, "old").unwrap();

        write_atomically(&target, |w| w.write_all(b"new")).unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
        assert!(!temp.path().join("out.txt.tmp").exists());
    }

    #[test]
    fn test_failed_write_keeps_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out.txt");
        std::fs::write(&target, "old").unwrap();

        let err = write_atomically(&target, |_| Err(std::io::Error::other("boom"))).unwrap_err();
        assert!(matches!(err, DawdashError::OutputError { .. }));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");
        assert!(!temp.path().join("out.txt.tmp").exists());
    }

    #[test]
    fn test_missing_directory_is_output_error() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("missing").join("out.txt");
        let err = write_atomically(&target, |w| w.write_all(b"x")).unwrap_err();
        assert!(matches!(err, DawdashError::OutputError { .. }));
    }
}
