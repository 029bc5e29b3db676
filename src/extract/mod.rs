//! Metadata extraction
//!
//! Each submodule reads one format's decoded XML into a [`ProjectMetadata`].
//! Extractors never fail: a node that is not there becomes `None`. The
//! [`Extractor`] front door pairs each format with its decoder and turns
//! decoder errors into "no metadata" so a bad file never stops a scan.

pub mod ableton;
pub mod akai_mpc;
pub mod bitwig;
pub mod cubase;
pub mod search;
pub mod studio_one;

pub use ableton::extract_ableton;
pub use akai_mpc::extract_akai_mpc;
pub use bitwig::extract_bitwig;
pub use cubase::extract_cubase;
pub use studio_one::extract_studio_one;

use crate::decode;
use crate::error::{DawdashError, Result};
use crate::types::{DawFormat, ProjectMetadata, ScaleTable};
use std::path::Path;
use tracing::{debug, warn};

/// Format dispatcher holding the scale-name table
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    scales: ScaleTable,
}

impl Extractor {
    pub fn new(scales: ScaleTable) -> Self {
        Self { scales }
    }

    pub fn scale_table(&self) -> &ScaleTable {
        &self.scales
    }

    /// Extract metadata from one project file
    ///
    /// Returns `None` when the file could not be decoded. A Bitwig project
    /// without its exported `.dawproject` gives empty metadata instead.
    pub fn extract(&self, path: &Path, format: DawFormat) -> Option<ProjectMetadata> {
        debug!("Extracting {} metadata from {}", format, path.display());

        match self.try_extract(path, format) {
            Ok(metadata) => Some(metadata),
            Err(e) if format == DawFormat::Bitwig && e.is_not_found() => {
                debug!("No Bitwig export for {}: {}", path.display(), e);
                Some(ProjectMetadata::default())
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Extract metadata, picking the format from an extension string
    ///
    /// Unknown extensions give `None`.
    pub fn extract_by_extension(&self, path: &Path, extension: &str) -> Option<ProjectMetadata> {
        match DawFormat::from_extension(extension) {
            Some(format) => self.extract(path, format),
            None => {
                warn!(
                    "{}",
                    DawdashError::UnsupportedFormat {
                        path: path.to_path_buf(),
                        format: extension.to_string(),
                    }
                );
                None
            }
        }
    }

    fn try_extract(&self, path: &Path, format: DawFormat) -> Result<ProjectMetadata> {
        let metadata = match format {
            DawFormat::Ableton => extract_ableton(&decode::decode_ableton(path)?, &self.scales),
            DawFormat::Bitwig => extract_bitwig(&decode::decode_bitwig(path)?),
            DawFormat::StudioOne => {
                extract_studio_one(&decode::decode_studio_one(path)?, &self.scales)
            }
            DawFormat::Cubase => extract_cubase(&decode::decode_cubase(path)?),
            DawFormat::AkaiMpc => extract_akai_mpc(&decode::decode_akai_mpc(path)?),
        };
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackCounts;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_bitwig_without_export_is_empty_metadata() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("Jam.bwproject");
        fs::write(&project, b"opaque").unwrap();

        let meta = Extractor::default().extract(&project, DawFormat::Bitwig);
        assert_eq!(meta, Some(ProjectMetadata::default()));
    }

    #[test]
    fn test_decode_failure_is_none() {
        let temp = TempDir::new().unwrap();
        let set = temp.path().join("Broken.als");
        fs::write(&set, b"not gzip at all").unwrap();

        assert_eq!(Extractor::default().extract(&set, DawFormat::Ableton), None);
        assert_eq!(
            Extractor::default().extract(&temp.path().join("missing.xpj"), DawFormat::AkaiMpc),
            None
        );
    }

    #[test]
    fn test_deeply_nested_project_is_unreadable() {
        let temp = TempDir::new().unwrap();
        let mpc = temp.path().join("Deep.xpj");
        let depth = 100_000;
        let xml = format!(
            "<Project><BPM>120</BPM>{}{}</Project>",
            "<Pad>".repeat(depth),
            "</Pad>".repeat(depth)
        );
        fs::write(&mpc, xml).unwrap();

        assert_eq!(Extractor::default().extract(&mpc, DawFormat::AkaiMpc), None);
    }

    #[test]
    fn test_extract_by_extension() {
        let temp = TempDir::new().unwrap();
        let mpc = temp.path().join("Beat.XPJ");
        fs::write(&mpc, "<Project><BPM>93</BPM><Mixer/></Project>").unwrap();

        let extractor = Extractor::default();
        let meta = extractor.extract_by_extension(&mpc, ".xpj").unwrap();
        assert_eq!(meta.tempo, Some(93.0));
        assert_eq!(meta.track_counts, Some(TrackCounts::Single { count: 0 }));

        assert_eq!(extractor.extract_by_extension(&mpc, "wav"), None);
    }
}
