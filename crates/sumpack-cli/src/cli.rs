//! CLI for the sumpack checksum and packaging tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sumpack_core::archive::ArchiveFormat;
use sumpack_core::config;
use sumpack_core::hash::ChecksumAlgorithm;

use commands::{run_algorithms, run_batch, run_checksum};

/// Top-level CLI for the sumpack tool.
#[derive(Debug, Parser)]
#[command(name = "sumpack")]
#[command(about = "sumpack: batch file checksums with sidecar files and tar.gz packaging", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Checksum every matching file in a directory, optionally writing
    /// sidecar files and packaging each file with its sidecars.
    Run {
        /// Directory to scan (default: from config).
        #[arg(long, value_name = "DIR")]
        files_dir: Option<PathBuf>,

        /// File extension filter, without the leading dot (default: from config).
        #[arg(long, value_name = "EXT")]
        file_ext: Option<String>,

        /// Checksum algorithms, comma separated: cksum, md5 (default: from config).
        #[arg(long, value_delimiter = ',', value_name = "ALGO")]
        algorithms: Vec<ChecksumAlgorithm>,

        /// Write one sidecar file per digest next to each source file.
        #[arg(long)]
        write_sidecars: bool,

        /// Package each file with its sidecars (requires --write-sidecars).
        #[arg(long, value_name = "FORMAT")]
        archive: Option<ArchiveFormat>,

        /// Keep going after a per-file failure and record it in the report.
        #[arg(long)]
        best_effort: bool,
    },

    /// Compute and print one file's digest without writing anything.
    Checksum {
        /// Path to the file.
        path: PathBuf,

        /// Checksum algorithm.
        #[arg(long, default_value = "md5")]
        algorithm: ChecksumAlgorithm,
    },

    /// List the supported checksum algorithms.
    Algorithms,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                files_dir,
                file_ext,
                algorithms,
                write_sidecars,
                archive,
                best_effort,
            } => run_batch(
                &cfg,
                files_dir,
                file_ext,
                algorithms,
                write_sidecars,
                archive,
                best_effort,
            ),
            CliCommand::Checksum { path, algorithm } => run_checksum(&path, algorithm),
            CliCommand::Algorithms => run_algorithms(),
        }
    }
}
