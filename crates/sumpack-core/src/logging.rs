//! Logging init: stderr only, so the report on stdout stays parseable.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr. Honors `RUST_LOG`; defaults to
/// `info` globally and `debug` for sumpack crates.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,sumpack_core=debug,sumpack_cli=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
