//! Global configuration loaded from `~/.config/sumpack/config.toml`.
//!
//! Config supplies the run defaults; CLI flags override individual values.

use crate::hash::ChecksumAlgorithm;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SumpackConfig {
    /// Directory scanned when the CLI is not given one.
    pub files_dir: String,
    /// Extension filter applied to the scan, without a leading dot.
    pub file_extension: String,
    /// Algorithms computed when the CLI does not name any.
    pub algorithms: Vec<ChecksumAlgorithm>,
}

impl Default for SumpackConfig {
    fn default() -> Self {
        Self {
            files_dir: "files".to_string(),
            file_extension: "txt".to_string(),
            algorithms: vec![ChecksumAlgorithm::Md5],
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sumpack")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SumpackConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SumpackConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SumpackConfig = toml::from_str(&data)?;
    Ok(cfg)
}
