//! Run command: batch checksum and packaging over a directory.

use anyhow::{bail, Result};
use std::path::PathBuf;
use sumpack_core::archive::ArchiveFormat;
use sumpack_core::batch::{BatchOptions, BatchRunner, FailurePolicy};
use sumpack_core::config::SumpackConfig;
use sumpack_core::hash::{ChecksumAlgorithm, HashRegistry};

/// Build the run options from config plus CLI overrides, run the batch,
/// and print the report as JSON on stdout.
pub fn run_batch(
    cfg: &SumpackConfig,
    files_dir: Option<PathBuf>,
    file_ext: Option<String>,
    algorithms: Vec<ChecksumAlgorithm>,
    write_sidecars: bool,
    archive: Option<ArchiveFormat>,
    best_effort: bool,
) -> Result<()> {
    let opts = BatchOptions {
        dir: files_dir.unwrap_or_else(|| PathBuf::from(&cfg.files_dir)),
        extension: file_ext.unwrap_or_else(|| cfg.file_extension.clone()),
        algorithms: if algorithms.is_empty() {
            cfg.algorithms.clone()
        } else {
            algorithms
        },
        write_sidecars,
        archive,
        policy: if best_effort {
            FailurePolicy::BestEffort
        } else {
            FailurePolicy::FailFast
        },
    };

    let runner = BatchRunner::new(HashRegistry::with_builtin());
    let report = runner.run(&opts)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    let failed = report.failed_count();
    if failed > 0 {
        bail!("{} file(s) failed", failed);
    }
    Ok(())
}
