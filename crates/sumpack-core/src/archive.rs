//! Archive composition: one source file plus its sidecars in a tar.gz.
//!
//! The archive stream (file -> gzip encoder -> tar builder) lives on the
//! stack of `compose`, so an error part way through still drops and closes
//! every layer. A partial archive may remain on disk after a genuine I/O
//! failure; a leaked handle may not.

use crate::error::{Result, SumpackError};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Closed set of archive container schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar.
    #[serde(rename = "tar.gz")]
    TarGz,
}

impl ArchiveFormat {
    /// Canonical file suffix, without a leading dot.
    pub fn suffix(self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for ArchiveFormat {
    type Err = SumpackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tar.gz" | "tgz" => Ok(ArchiveFormat::TarGz),
            other => Err(SumpackError::InvalidConfiguration(format!(
                "unknown archive format: {}",
                other
            ))),
        }
    }
}

/// One item to store: bytes read from `disk_path`, stored under `name`.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub disk_path: PathBuf,
    pub name: String,
}

impl ArchiveEntry {
    /// Entry named by the file's base name; directory structure is stripped.
    pub fn from_path(disk_path: impl Into<PathBuf>) -> Self {
        let disk_path = disk_path.into();
        let name = disk_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        ArchiveEntry { disk_path, name }
    }
}

/// Archive path for `source`: its extension replaced with the format suffix,
/// e.g. `report.txt` -> `report.tar.gz`.
pub fn archive_path(source: &Path, format: ArchiveFormat) -> PathBuf {
    source.with_extension(format.suffix())
}

/// Create (or overwrite) the archive at `path` and store each entry in the
/// given order.
pub fn compose(path: &Path, entries: &[ArchiveEntry]) -> Result<()> {
    let file = File::create(path).map_err(|e| SumpackError::io("create", path, e))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for entry in entries {
        let mut src =
            File::open(&entry.disk_path).map_err(|e| SumpackError::io("open", &entry.disk_path, e))?;
        builder
            .append_file(Path::new(&entry.name), &mut src)
            .map_err(|e| SumpackError::io("append", &entry.disk_path, e))?;
    }
    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .map_err(|e| SumpackError::io("finish", path, e))?;
    tracing::debug!("composed archive {}", path.display());
    Ok(())
}
