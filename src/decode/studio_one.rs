//! Studio One song decoder
//!
//! A `.song` is a zip archive. Three members matter and each is optional:
//! `metainfo.xml` (tempo), `Song/editor.xml` (musical scale) and
//! `Song/song.xml` (track list).

use super::ZipBundle;
use crate::document::XmlDocument;
use crate::error::Result;
use std::path::Path;
use tracing::{debug, warn};

pub const METAINFO_MEMBER: &str = "metainfo.xml";
pub const EDITOR_MEMBER: &str = "Song/editor.xml";
pub const SONG_MEMBER: &str = "Song/song.xml";

/// Whatever members of a `.song` archive could be parsed
#[derive(Debug, Clone, Default)]
pub struct StudioOneDocuments {
    pub metainfo: Option<XmlDocument>,
    pub editor: Option<XmlDocument>,
    pub song: Option<XmlDocument>,
}

/// Decode a `.song` archive
///
/// Only a file that is not a readable zip at all fails; a missing or broken
/// member just leaves its slot empty.
pub fn decode_studio_one(path: &Path) -> Result<StudioOneDocuments> {
    let mut bundle = ZipBundle::open(path)?;

    Ok(StudioOneDocuments {
        metainfo: optional_member(&mut bundle, METAINFO_MEMBER, path),
        editor: optional_member(&mut bundle, EDITOR_MEMBER, path),
        song: optional_member(&mut bundle, SONG_MEMBER, path),
    })
}

fn optional_member<R: std::io::Read + std::io::Seek>(
    bundle: &mut ZipBundle<R>,
    member: &str,
    path: &Path,
) -> Option<XmlDocument> {
    match bundle.parse_member(member) {
        Ok(Some(doc)) => Some(doc),
        Ok(None) => {
            debug!("{} has no {}", path.display(), member);
            None
        }
        Err(e) => {
            warn!("Skipping {} in {}: {}", member, path.display(), e);
            None
        }
    }
}
