//! Core error types for sshw

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Config file was missing and a default one has been written in its place
    #[error(
        "The configuration file {0:?} was not found; a default configuration was generated there.\n\
         Edit it and run sshw again."
    )]
    Generated(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing the config file failed
    #[error("Failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path resolution failed
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Errors raised while expanding or resolving paths
#[derive(Error, Debug)]
pub enum PathError {
    /// The invoking user's home directory could not be determined
    #[error("Unable to determine the home directory")]
    NoHomeDir,

    /// The current working directory could not be read
    #[error("Unable to determine the current directory: {0}")]
    NoCurrentDir(#[source] std::io::Error),
}
