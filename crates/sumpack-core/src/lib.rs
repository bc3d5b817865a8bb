pub mod config;
pub mod logging;

// Pipeline modules, leaf first.
pub mod archive;
pub mod batch;
pub mod error;
pub mod hash;
pub mod sidecar;
