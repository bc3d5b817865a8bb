//! Checksum computation over file contents.
//!
//! Digests are produced by streaming the file in bounded chunks, so memory
//! use stays flat for large files. Algorithms are looked up in a capability
//! registry assembled at startup; adding an algorithm means registering a
//! capability, not editing control flow.

use crate::error::{Result, SumpackError};
use crc::Crc;
use md5::{Digest as _, Md5};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const BUF_SIZE: usize = 64 * 1024;

/// Closed set of supported checksum algorithms.
///
/// The uppercase name keys the report; the lowercase value names sidecar
/// suffixes and CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChecksumAlgorithm {
    /// POSIX cksum: CRC-32 over content plus length octets.
    #[serde(alias = "cksum")]
    Cksum,
    /// MD5, rendered as lowercase hex.
    #[serde(alias = "md5")]
    Md5,
}

impl ChecksumAlgorithm {
    pub const ALL: [ChecksumAlgorithm; 2] = [ChecksumAlgorithm::Cksum, ChecksumAlgorithm::Md5];

    /// Lowercase identifier, used for sidecar file suffixes and CLI values.
    pub fn value(self) -> &'static str {
        match self {
            ChecksumAlgorithm::Cksum => "cksum",
            ChecksumAlgorithm::Md5 => "md5",
        }
    }

    /// Uppercase identifier, used as the report key.
    pub fn name(self) -> &'static str {
        match self {
            ChecksumAlgorithm::Cksum => "CKSUM",
            ChecksumAlgorithm::Md5 => "MD5",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = SumpackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cksum" => Ok(ChecksumAlgorithm::Cksum),
            "md5" => Ok(ChecksumAlgorithm::Md5),
            other => Err(SumpackError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// One algorithm's implementation: reads a file and returns its canonical
/// text digest.
pub trait HashCapability: Send + Sync {
    fn digest_file(&self, path: &Path) -> Result<String>;
}

/// Lookup table from algorithm to hash capability.
pub struct HashRegistry {
    capabilities: BTreeMap<ChecksumAlgorithm, Box<dyn HashCapability>>,
}

impl HashRegistry {
    /// Registry with no capabilities. Every compute fails with
    /// `UnsupportedAlgorithm` until something is registered.
    pub fn empty() -> Self {
        HashRegistry {
            capabilities: BTreeMap::new(),
        }
    }

    /// Registry with the built-in capability set (cksum, md5).
    pub fn with_builtin() -> Self {
        let mut registry = HashRegistry::empty();
        registry.register(ChecksumAlgorithm::Cksum, Box::new(CksumCapability));
        registry.register(ChecksumAlgorithm::Md5, Box::new(Md5Capability));
        registry
    }

    pub fn register(&mut self, algorithm: ChecksumAlgorithm, capability: Box<dyn HashCapability>) {
        self.capabilities.insert(algorithm, capability);
    }

    /// Compute `algorithm`'s digest of the file at `path`.
    pub fn compute(&self, path: &Path, algorithm: ChecksumAlgorithm) -> Result<String> {
        let capability = self
            .capabilities
            .get(&algorithm)
            .ok_or_else(|| SumpackError::UnsupportedAlgorithm(algorithm.to_string()))?;
        capability.digest_file(path)
    }
}

impl Default for HashRegistry {
    fn default() -> Self {
        HashRegistry::with_builtin()
    }
}

/// Feed the file's bytes to `sink` in chunks; returns the byte count.
/// The handle is scoped to this call and dropped on every exit path.
fn stream_file(path: &Path, mut sink: impl FnMut(&[u8])) -> Result<u64> {
    let mut f = File::open(path).map_err(|e| SumpackError::io("open", path, e))?;
    let mut buf = [0u8; BUF_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = f
            .read(&mut buf)
            .map_err(|e| SumpackError::io("read", path, e))?;
        if n == 0 {
            break;
        }
        sink(&buf[..n]);
        total += n as u64;
    }
    Ok(total)
}

struct Md5Capability;

impl HashCapability for Md5Capability {
    fn digest_file(&self, path: &Path) -> Result<String> {
        let mut hasher = Md5::new();
        stream_file(path, |chunk| hasher.update(chunk))?;
        Ok(hex::encode(hasher.finalize()))
    }
}

static CKSUM_CRC: Crc<u32> = Crc::<u32>::new(&crc::CRC_32_CKSUM);

struct CksumCapability;

impl HashCapability for CksumCapability {
    fn digest_file(&self, path: &Path) -> Result<String> {
        let mut digest = CKSUM_CRC.digest();
        let total = stream_file(path, |chunk| digest.update(chunk))?;
        // cksum(1) appends the byte count as minimal little-endian octets
        // before the final complement.
        let mut n = total;
        while n != 0 {
            digest.update(&[(n & 0xff) as u8]);
            n >>= 8;
        }
        Ok(format!("{} {}", digest.finalize(), total))
    }
}
