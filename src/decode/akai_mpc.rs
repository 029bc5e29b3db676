//! Akai MPC project decoder
//!
//! `.xpj` files are plain XML rooted at `<Project>`.

use super::read_file;
use crate::document::XmlDocument;
use crate::error::{DawdashError, Result};
use std::path::Path;

pub const PROJECT_TAG: &str = "Project";

/// Read and parse an `.xpj` file
pub fn decode_akai_mpc(path: &Path) -> Result<XmlDocument> {
    let bytes = read_file(path)?;
    let doc = XmlDocument::parse_bytes(&bytes, path)?;
    if doc.root.name != PROJECT_TAG {
        return Err(DawdashError::unexpected_format(
            path,
            format!("root element is <{}>, expected <{}>", doc.root.name, PROJECT_TAG),
        ));
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decode_project() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("beat.xpj");
        std::fs::write(&path, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Project><BPM>92</BPM></Project>").unwrap();

        let doc = decode_akai_mpc(&path).unwrap();
        assert_eq!(doc.root.child("BPM").and_then(|n| n.text()), Some("92"));
    }

    #[test]
    fn test_wrong_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("beat.xpj");
        std::fs::write(&path, "<Program/>").unwrap();

        let err = decode_akai_mpc(&path).unwrap_err();
        assert!(matches!(err, DawdashError::UnexpectedFormat { .. }));
    }
}
