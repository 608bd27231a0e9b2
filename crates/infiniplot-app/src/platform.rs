//! OS directory resolution for config, logs and snapshots.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use infiniplot_config::default_config_dir;

const APP_NAME: &str = "infiniplot";

/// Errors resolving or creating application directories.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where infiniplot keeps its files.
///
/// Follows OS conventions through `dirs` (XDG on Linux, Known Folders on
/// Windows, Library on macOS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// `config.ron` lives here.
    pub config_dir: PathBuf,
    /// JSON log files.
    pub log_dir: PathBuf,
    /// Default location for PNG snapshots.
    pub snapshot_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve the directories without creating them.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_dir = default_config_dir().map_err(|_| PlatformError::NoConfigDir)?;
        let data_dir = dirs::data_dir()
            .map(|d| d.join(APP_NAME))
            .unwrap_or_else(|| config_dir.clone());
        Ok(Self {
            log_dir: config_dir.join("logs"),
            snapshot_dir: data_dir.join("snapshots"),
            config_dir,
        })
    }

    /// Lay logs and snapshots out under an explicit config directory, as
    /// given on the command line.
    pub fn with_config_dir(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            log_dir: config_dir.join("logs"),
            snapshot_dir: config_dir.join("snapshots"),
        }
    }

    /// Create every directory on disk.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        for dir in [&self.config_dir, &self.log_dir, &self.snapshot_dir] {
            std::fs::create_dir_all(dir).map_err(|source| PlatformError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
