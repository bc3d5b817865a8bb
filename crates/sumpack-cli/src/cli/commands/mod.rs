//! CLI command handlers, one per file.

mod algorithms;
mod checksum;
mod run;

pub use algorithms::run_algorithms;
pub use checksum::run_checksum;
pub use run::run_batch;
