//! Ableton Live set decoder
//!
//! `.als` files are gzip-compressed XML documents rooted at `<Ableton>`.

use super::read_file;
use crate::document::XmlDocument;
use crate::error::{DawdashError, ErrorContext, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Gzip magic number
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decode an `.als` file into its XML document
pub fn decode_ableton(path: &Path) -> Result<XmlDocument> {
    let bytes = read_file(path)?;
    let xml = gunzip(&bytes, path)?;
    debug!(
        "Decompressed {} ({} -> {} bytes)",
        path.display(),
        bytes.len(),
        xml.len()
    );
    XmlDocument::parse_bytes(&xml, path)
}

/// Check the gzip header and inflate the whole stream
pub(crate) fn gunzip(bytes: &[u8], path: &Path) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Err(DawdashError::unexpected_format(
            path,
            "not gzip-compressed (missing 1f 8b header)",
        ));
    }

    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).malformed_in(path)?;
    Ok(out)
}
