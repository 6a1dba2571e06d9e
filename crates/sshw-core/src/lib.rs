//! sshw-core: Data model and configuration for sshw
//!
//! This crate provides the host tree (groups of SSH targets), config file
//! handling and path helpers shared by the session engine and the CLI.

pub mod config;
pub mod error;
pub mod paths;

pub use config::{Config, Target, TargetGroup};
pub use error::{ConfigError, PathError};
