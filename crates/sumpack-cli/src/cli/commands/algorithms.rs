//! Algorithms command: list the supported checksum algorithms.

use anyhow::Result;
use sumpack_core::hash::ChecksumAlgorithm;

pub fn run_algorithms() -> Result<()> {
    for algorithm in ChecksumAlgorithm::ALL {
        println!("{}", algorithm.value());
    }
    Ok(())
}
