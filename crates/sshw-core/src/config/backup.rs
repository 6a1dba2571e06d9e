//! Timestamped config backups

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::ConfigError;

/// Copy `path` to `<path>.<YYYYmmdd_HHMMSS>.bak` and return the backup path.
pub fn backup_config(path: &Path) -> Result<PathBuf, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let backup_path = backup_path_for(path, &Local::now().format("%Y%m%d_%H%M%S").to_string());
    std::fs::write(&backup_path, content).map_err(|source| ConfigError::Io {
        path: backup_path.clone(),
        source,
    })?;

    tracing::info!("Backed up {:?} to {:?}", path, backup_path);
    Ok(backup_path)
}

fn backup_path_for(path: &Path, stamp: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}.bak", stamp));
    PathBuf::from(name)
}
