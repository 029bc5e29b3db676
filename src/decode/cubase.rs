//! Cubase project decoder
//!
//! `.cpr` files are an undocumented binary container. What Cubase does write
//! in readable form are track archive exports (`File > Export > Tracks`):
//! XML documents rooted at `<tracklist>`. The decoder looks for such an export
//! among the project's sibling `.xml` files.

use crate::document::{XmlDocument, XmlNode};
use crate::error::{DawdashError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const TRACKLIST_TAG: &str = "tracklist";

/// Find and parse the first sibling XML export that carries a track list
pub fn decode_cubase(path: &Path) -> Result<XmlDocument> {
    if !path.exists() {
        return Err(DawdashError::FileNotFound(path.to_path_buf()));
    }
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    for candidate in xml_siblings(dir)? {
        let text = match std::fs::read_to_string(&candidate) {
            Ok(text) => text,
            Err(e) => {
                warn!("Cannot read {}: {}", candidate.display(), e);
                continue;
            }
        };
        match XmlDocument::parse_str(&text, &candidate) {
            Ok(doc) if tracklist(&doc.root).is_some() => {
                debug!("Using {} for {}", candidate.display(), path.display());
                return Ok(doc);
            }
            Ok(_) => debug!("{} has no {}", candidate.display(), TRACKLIST_TAG),
            Err(e) => warn!("Skipping {}: {}", candidate.display(), e),
        }
    }

    Err(DawdashError::FileNotFound(dir.join(format!("*.xml <{}>", TRACKLIST_TAG))))
}

/// The top-level track list: the root itself or a direct child of it
pub fn tracklist(root: &XmlNode) -> Option<&XmlNode> {
    if root.name == TRACKLIST_TAG {
        Some(root)
    } else {
        root.child(TRACKLIST_TAG)
    }
}

/// `.xml` files next to the project, sorted by file name
fn xml_siblings(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| DawdashError::from_io(dir, e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
        })
        .collect();
    files.sort();
    Ok(files)
}
