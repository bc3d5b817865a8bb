//! Checksum command: compute one file's digest, no disk writes.

use anyhow::Result;
use std::path::Path;
use sumpack_core::hash::{ChecksumAlgorithm, HashRegistry};

/// Compute and print the digest of the given file.
pub fn run_checksum(path: &Path, algorithm: ChecksumAlgorithm) -> Result<()> {
    let digest = HashRegistry::with_builtin().compute(path, algorithm)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
