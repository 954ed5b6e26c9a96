mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub data_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Inventory database file. When `None`, the caller infers one or creates
    /// a fresh file in the working directory.
    pub db_path: Option<PathBuf>,
    /// Combos data file overriding the builtin table.
    pub data_path: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // TOML overrides CLI for each field
        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone());

        let data_path = file
            .data_path
            .map(PathBuf::from)
            .or_else(|| cli.data_path.clone());

        if let Some(path) = &data_path {
            if !path.is_file() {
                bail!("Combos data file not found: {:?}", path);
            }
        }

        Ok(Self { db_path, data_path })
    }
}
