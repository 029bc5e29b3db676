//! Bitwig Studio decoder
//!
//! A `.bwproject` carries nothing readable. Bitwig's "Export Project" writes a
//! `.dawproject` next to it: a zip holding `project.xml` (transport and track
//! structure) and optionally `metadata.xml` (title, artist).

use super::ZipBundle;
use crate::document::XmlDocument;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

const PROJECT_MEMBER: &str = "project.xml";
const METADATA_MEMBER: &str = "metadata.xml";

/// Parsed members of a `.dawproject` archive
#[derive(Debug, Clone)]
pub struct BitwigDocuments {
    pub project: XmlDocument,
    pub metadata: Option<XmlDocument>,
}

/// Sibling `.dawproject` path for a `.bwproject`
pub fn dawproject_path(path: &Path) -> PathBuf {
    path.with_extension("dawproject")
}

/// Decode the `.dawproject` exported next to a `.bwproject`
///
/// A missing sibling is `FileNotFound` and a missing `project.xml` is
/// `MemberNotFound`; callers treat both as "no metadata available".
pub fn decode_bitwig(path: &Path) -> Result<BitwigDocuments> {
    let sibling = dawproject_path(path);
    debug!("Looking for Bitwig export at {}", sibling.display());

    let mut bundle = ZipBundle::open(&sibling)?;
    let project = bundle.require_member(PROJECT_MEMBER)?;

    // metadata.xml is optional and never spoils project.xml
    let metadata = match bundle.parse_member(METADATA_MEMBER) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("Ignoring unreadable {}: {}", METADATA_MEMBER, e);
            None
        }
    };

    Ok(BitwigDocuments { project, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::fixtures::zip_bytes;
    use crate::error::DawdashError;
    use tempfile::TempDir;

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            dawproject_path(Path::new("/p/My Track.bwproject")),
            PathBuf::from("/p/My Track.dawproject")
        );
    }

    #[test]
    fn test_missing_sibling_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song.bwproject");
        std::fs::write(&path, b"BtWg").unwrap();

        let err = decode_bitwig(&path).unwrap_err();
        assert!(matches!(err, DawdashError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_project_member() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song.bwproject");
        std::fs::write(dir.path().join("song.dawproject"), zip_bytes(&[("other.xml", "<X/>")]))
            .unwrap();

        let err = decode_bitwig(&path).unwrap_err();
        assert!(matches!(err, DawdashError::MemberNotFound { .. }));
    }

    #[test]
    fn test_reads_project_and_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song.bwproject");
        std::fs::write(
            dir.path().join("song.dawproject"),
            zip_bytes(&[
                ("project.xml", "<Project version=\"1.0\"/>"),
                ("metadata.xml", "<MetaData><Title>T</Title></MetaData>"),
            ]),
        )
        .unwrap();

        let docs = decode_bitwig(&path).unwrap();
        assert_eq!(docs.project.root.name, "Project");
        assert_eq!(docs.metadata.unwrap().root.name, "MetaData");
    }
}
