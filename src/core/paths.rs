//! Config directory resolution and file layout.

use crate::constants;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub store_file: PathBuf,
    pub store_lock: PathBuf,
    pub audit_log: PathBuf,
    pub audit_lock: PathBuf,
}

impl ConfigPaths {
    /// Resolve the config directory from the CLI arg, falling back to the
    /// platform default. A relative arg is resolved against the current
    /// working directory.
    pub fn resolve(config_arg: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = config_arg {
            let cwd = env::current_dir().context("resolve current directory")?;
            return Ok(Self::from_config_dir(cwd.join(dir)));
        }
        let dirs = ProjectDirs::from("", "", "hearth")
            .context("determine default config directory")?;
        Ok(Self::from_config_dir(dirs.config_dir().to_path_buf()))
    }

    /// Derive file paths from a config directory.
    pub fn from_config_dir(config_dir: PathBuf) -> Self {
        let store_file = config_dir.join(constants::STORE_FILE_NAME);
        let store_lock = config_dir.join(constants::STORE_LOCK_NAME);
        let audit_log = config_dir.join(constants::AUDIT_LOG_NAME);
        let audit_lock = config_dir.join(constants::AUDIT_LOCK_NAME);
        Self {
            config_dir,
            store_file,
            store_lock,
            audit_log,
            audit_lock,
        }
    }
}
