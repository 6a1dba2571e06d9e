//! List command implementation

use std::path::Path;

use anyhow::{Context, Result};

use crate::output::format_targets;
use sshw_core::config;

/// Print every configured target as a table
pub fn list_command(config_path: &Path, long: bool) -> Result<()> {
    let config = config::load_config(config_path)
        .with_context(|| format!("Failed to load {:?}", config_path))?;

    println!("{}", format_targets(&config, long));
    Ok(())
}
