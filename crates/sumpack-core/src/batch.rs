//! Directory batch runner: hash, persist, and package each matching file.
//!
//! Files are processed strictly sequentially and independently; the only
//! shared resource is the filesystem. The failure policy decides whether
//! one file's error aborts the run or is recorded in the report.

use crate::archive::{self, ArchiveEntry, ArchiveFormat};
use crate::error::{Result, SumpackError};
use crate::hash::{ChecksumAlgorithm, HashRegistry};
use crate::sidecar;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// How the runner reacts when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first error aborts the whole run; no report is returned.
    #[default]
    FailFast,
    /// Record the failure in the report and continue with remaining files.
    BestEffort,
}

/// Inputs for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory whose immediate entries are scanned (non-recursive).
    pub dir: PathBuf,
    /// Extension filter, without the leading dot.
    pub extension: String,
    /// Algorithms to compute, in caller order.
    pub algorithms: Vec<ChecksumAlgorithm>,
    /// Persist one sidecar file per digest next to each source file.
    pub write_sidecars: bool,
    /// Package each file with its sidecars; requires `write_sidecars`.
    pub archive: Option<ArchiveFormat>,
    pub policy: FailurePolicy,
}

/// Digests for one file, keyed by algorithm.
pub type ChecksumResult = BTreeMap<ChecksumAlgorithm, String>;

/// Per-file outcome. Successful files serialize as their digest map,
/// failed files (best-effort only) as `{"error": "..."}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FileOutcome {
    Checksums(ChecksumResult),
    Failed { error: String },
}

/// Result of one run: outcomes keyed by file name, one entry per matched
/// file, in no guaranteed order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct BatchReport {
    pub files: BTreeMap<String, FileOutcome>,
}

impl BatchReport {
    pub fn checksums(&self, file: &str) -> Option<&ChecksumResult> {
        match self.files.get(file) {
            Some(FileOutcome::Checksums(result)) => Some(result),
            _ => None,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.files
            .values()
            .filter(|outcome| matches!(outcome, FileOutcome::Failed { .. }))
            .count()
    }
}

/// One candidate file discovered during the directory scan.
#[derive(Debug, Clone)]
struct FileRecord {
    path: PathBuf,
    name: String,
}

/// Batch runner bound to a hash capability registry.
pub struct BatchRunner {
    registry: HashRegistry,
}

impl BatchRunner {
    pub fn new(registry: HashRegistry) -> Self {
        BatchRunner { registry }
    }

    /// Scan `opts.dir` and process every matching file.
    pub fn run(&self, opts: &BatchOptions) -> Result<BatchReport> {
        if opts.archive.is_some() && !opts.write_sidecars {
            return Err(SumpackError::InvalidConfiguration(
                "archiving requires sidecar files on disk; enable write_sidecars".to_string(),
            ));
        }

        tracing::info!(
            "scanning {} for *.{} ({} algorithm(s))",
            opts.dir.display(),
            opts.extension,
            opts.algorithms.len()
        );

        let mut report = BatchReport::default();
        for record in discover(&opts.dir, &opts.extension)? {
            match self.process_file(&record, opts) {
                Ok(result) => {
                    report.files.insert(record.name, FileOutcome::Checksums(result));
                }
                Err(err) if opts.policy == FailurePolicy::BestEffort => {
                    tracing::warn!("{}: {}", record.name, err);
                    report
                        .files
                        .insert(record.name, FileOutcome::Failed { error: err.to_string() });
                }
                Err(err) => return Err(err),
            }
        }
        Ok(report)
    }

    /// Hash, persist, and package one file.
    fn process_file(&self, record: &FileRecord, opts: &BatchOptions) -> Result<ChecksumResult> {
        tracing::debug!("processing {}", record.path.display());
        let mut result = ChecksumResult::new();
        let mut sidecars = Vec::new();
        for &algorithm in &opts.algorithms {
            let digest = self.registry.compute(&record.path, algorithm)?;
            if opts.write_sidecars {
                sidecars.push(sidecar::write(&record.path, algorithm, &digest)?);
            }
            result.insert(algorithm, digest);
        }
        if let Some(format) = opts.archive {
            // Source first, then the sidecars written in this run. Stale
            // sidecars from algorithms not requested here are never packed.
            let mut entries = vec![ArchiveEntry::from_path(&record.path)];
            entries.extend(sidecars.iter().map(ArchiveEntry::from_path));
            archive::compose(&archive::archive_path(&record.path, format), &entries)?;
        }
        Ok(result)
    }
}

fn discover(dir: &Path, extension: &str) -> Result<Vec<FileRecord>> {
    let wanted = format!(".{}", extension);
    let mut records = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| SumpackError::io("read dir", dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SumpackError::io("read dir", dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| SumpackError::io("stat", entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(&wanted) {
            continue;
        }
        records.push(FileRecord {
            path: entry.path(),
            name,
        });
    }
    Ok(records)
}
