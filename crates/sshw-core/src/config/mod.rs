//! Configuration management for sshw

mod backup;
mod target;
mod validate;

pub use backup::backup_config;
pub use target::{Config, Target, TargetGroup, DEFAULT_PORT, DEFAULT_USER};
pub use validate::validate;

use crate::error::ConfigError;
use crate::paths;
use std::path::{Path, PathBuf};

/// Template written when no config file exists yet
pub const DEFAULT_CONFIG: &str = r#"# sshw configuration
#
# Each [[groups]] entry is a top-level menu item; its [[groups.targets]]
# entries are the hosts shown after picking the group.
#
# Target fields:
#   name        display label (required)
#   alias       short tag shown next to the name
#   host        DNS name or IP (required)
#   user        login user, default "root"
#   port        SSH port, default 22
#   key_path    private key, default ~/.ssh/id_rsa
#   passphrase  passphrase for key_path
#   password    password; prompted for when neither key nor password works

[[groups]]
name = "example"

[[groups.targets]]
name = "localhost"
alias = "local"
host = "127.0.0.1"
user = "root"
port = 22
"#;

/// Resolve the config path from an optional CLI override
pub fn config_path(override_path: Option<&str>) -> Result<PathBuf, ConfigError> {
    match override_path {
        Some(raw) => Ok(paths::resolve_config_path(raw)?),
        None => Ok(paths::default_config_path()?),
    }
}

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Load and validate configuration, generating a default file if none exists.
///
/// When the file is missing the template is written in its place and
/// [`ConfigError::Generated`] is returned so the caller can tell the user to
/// edit it.
pub fn load_or_generate(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        write_default_config(path)?;
        return Err(ConfigError::Generated(path.to_path_buf()));
    }

    let config = load_config(path)?;
    validate(&config)?;
    tracing::debug!(
        "Loaded {} groups / {} targets from {:?}",
        config.groups.len(),
        config.target_count(),
        path
    );
    Ok(config)
}

/// Write the default template to `path`, creating parent directories
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    write_file(path, DEFAULT_CONFIG)
}

/// Render `config` as TOML with passwords and passphrases masked
pub fn render_redacted(config: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(&config.redacted())?)
}

fn write_file(path: &Path, content: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
