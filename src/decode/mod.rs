//! Container decoders
//!
//! One decoder per DAW format. Each takes a project file path and produces the
//! parsed XML the matching extractor needs, or a [`DawdashError`] describing
//! why it could not. Decoders read whole files; nothing is streamed.

pub mod ableton;
pub mod akai_mpc;
pub mod bitwig;
pub mod cubase;
pub mod studio_one;

pub use ableton::decode_ableton;
pub use akai_mpc::decode_akai_mpc;
pub use bitwig::{decode_bitwig, BitwigDocuments};
pub use cubase::decode_cubase;
pub use studio_one::{decode_studio_one, StudioOneDocuments};

use crate::document::XmlDocument;
use crate::error::{DawdashError, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

/// Read a whole file, reporting a missing file as `FileNotFound`
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(DawdashError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read(path).map_err(|e| DawdashError::from_io(path, e))
}

/// Largest member size read out of a zip container (256 MiB)
pub(crate) const MAX_MEMBER_BYTES: u64 = 256 * 1024 * 1024;

/// A zip container with by-name member access
pub(crate) struct ZipBundle<R> {
    path: PathBuf,
    archive: ZipArchive<R>,
    member_limit: u64,
}

impl ZipBundle<BufReader<File>> {
    /// Open a zip file from disk
    pub(crate) fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DawdashError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| DawdashError::from_io(path, e))?;
        Self::new(BufReader::new(file), path)
    }
}

impl<R: Read + Seek> ZipBundle<R> {
    pub(crate) fn new(reader: R, path: &Path) -> Result<Self> {
        let archive = ZipArchive::new(reader).map_err(|e| zip_error(path, e))?;
        debug!("Opened archive {} ({} members)", path.display(), archive.len());
        Ok(Self {
            path: path.to_path_buf(),
            archive,
            member_limit: MAX_MEMBER_BYTES,
        })
    }

    #[cfg(test)]
    fn with_member_limit(mut self, limit: u64) -> Self {
        self.member_limit = limit;
        self
    }

    /// Read a member by exact name; `Ok(None)` when it is absent
    ///
    /// The declared size is not trusted for allocation. Members declaring or
    /// inflating to more than the member limit are rejected as malformed.
    pub(crate) fn read_member(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let limit = self.member_limit;
        let member = match self.archive.by_name(name) {
            Ok(member) => member,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(zip_error(&self.path, e)),
        };
        if member.size() > limit {
            return Err(DawdashError::malformed(
                &self.path,
                format!("{}: declared size {} exceeds {} bytes", name, member.size(), limit),
            ));
        }

        let mut bytes = Vec::new();
        member
            .take(limit + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| DawdashError::malformed(&self.path, format!("{}: {}", name, e)))?;
        if bytes.len() as u64 > limit {
            return Err(DawdashError::malformed(
                &self.path,
                format!("{}: inflates past {} bytes", name, limit),
            ));
        }
        Ok(Some(bytes))
    }

    /// Read and parse a member; `Ok(None)` when it is absent
    pub(crate) fn parse_member(&mut self, name: &str) -> Result<Option<XmlDocument>> {
        let source = self.member_path(name);
        match self.read_member(name)? {
            Some(bytes) => XmlDocument::parse_bytes(&bytes, &source).map(Some),
            None => Ok(None),
        }
    }

    /// Read and parse a member that must exist
    pub(crate) fn require_member(&mut self, name: &str) -> Result<XmlDocument> {
        self.parse_member(name)?
            .ok_or_else(|| DawdashError::MemberNotFound {
                archive: self.path.clone(),
                member: name.to_string(),
            })
    }

    /// Display path for a member, used in error messages
    fn member_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

fn zip_error(path: &Path, err: ZipError) -> DawdashError {
    match err {
        ZipError::Io(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ) =>
        {
            DawdashError::from_io(path, e)
        }
        other => DawdashError::malformed(path, format!("invalid zip archive: {}", other)),
    }
}
