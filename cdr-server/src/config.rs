//! Storage configuration derived from the command line.

use directories::ProjectDirs;
use log::debug;
use std::path::PathBuf;
use thiserror::Error;

use crate::Cli;

/// File name of the JSON snapshot inside the data directory
pub const SNAPSHOT_FILE: &str = "storage.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No home directory found; pass --data-dir")]
    NoDataDir,
}

/// Storage backend selection on the command line
#[derive(clap::ValueEnum, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum StorageKind {
    /// Keep everything in memory for the lifetime of the process
    #[default]
    Memory,
    /// Keep a JSON snapshot in the data directory
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Json { path: PathBuf },
}

impl StorageConfig {
    pub fn from_cli(args: &Cli) -> Result<Self, ConfigError> {
        match args.storage {
            StorageKind::Memory => Ok(StorageConfig::Memory),
            StorageKind::Json => {
                let mut path = match &args.data_dir {
                    Some(dir) => dir.clone(),
                    None => data_dir()?,
                };
                path.push(SNAPSHOT_FILE);
                debug!("JSON storage snapshot: {}", path.display());
                Ok(StorageConfig::Json { path })
            }
        }
    }
}

pub fn get_project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "cdrtools", "cdr-server")
}

/// Platform data directory, e.g. `~/.local/share/cdr-server`
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    get_project_dirs()
        .map(|dirs| dirs.data_dir().to_owned())
        .ok_or(ConfigError::NoDataDir)
}
