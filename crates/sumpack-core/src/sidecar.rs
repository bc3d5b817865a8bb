//! Sidecar files: one digest persisted next to its source file.
//!
//! A sidecar is named `<source>.<algorithm value>` (suffix appended, the
//! source's own extension kept). Writes are overwrite-only: a stale sidecar
//! is removed before the new digest lands, so prior content never survives.

use crate::error::{Result, SumpackError};
use crate::hash::ChecksumAlgorithm;
use std::fs;
use std::path::{Path, PathBuf};

/// Sidecar path for `source` and `algorithm`, e.g. `report.txt` + md5 ->
/// `report.txt.md5`.
pub fn sidecar_path(source: &Path, algorithm: ChecksumAlgorithm) -> PathBuf {
    let mut os = source.as_os_str().to_os_string();
    os.push(".");
    os.push(algorithm.value());
    PathBuf::from(os)
}

/// Write `digest` as the sole content of the sidecar for `source`.
pub fn write(source: &Path, algorithm: ChecksumAlgorithm, digest: &str) -> Result<PathBuf> {
    let path = sidecar_path(source, algorithm);
    if path.is_file() {
        fs::remove_file(&path).map_err(|e| SumpackError::io("remove", &path, e))?;
    }
    fs::write(&path, digest).map_err(|e| SumpackError::io("write", &path, e))?;
    tracing::debug!("wrote sidecar {}", path.display());
    Ok(path)
}
