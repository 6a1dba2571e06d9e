//! Config command implementations

use std::path::Path;

use anyhow::{Context, Result};

use crate::output::{print_error, print_info, print_success};
use sshw_core::config;

/// Print the resolved config file path
pub fn config_path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}

/// Print the loaded configuration with secrets redacted
pub fn config_show(config_path: &Path) -> Result<()> {
    let config = config::load_config(config_path)
        .with_context(|| format!("Failed to load {:?}", config_path))?;
    config::validate(&config)?;

    let rendered = config::render_redacted(&config).context("Failed to render configuration")?;
    print!("{}", rendered);
    Ok(())
}

/// Load and validate the config file, reporting the outcome
pub fn config_validate(config_path: &Path) -> Result<()> {
    let config = match config::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e.to_string());
            anyhow::bail!("{:?} is not a valid configuration", config_path);
        }
    };

    if let Err(e) = config::validate(&config) {
        print_error(&e.to_string());
        anyhow::bail!("{:?} is not a valid configuration", config_path);
    }

    print_success(&format!(
        "{:?} is valid ({} groups, {} targets)",
        config_path,
        config.groups.len(),
        config.target_count()
    ));
    Ok(())
}

/// Copy the config file to a timestamped backup
pub fn config_backup(config_path: &Path) -> Result<()> {
    let backup = config::backup_config(config_path)
        .with_context(|| format!("Failed to back up {:?}", config_path))?;
    print_success(&format!("Backup written to {:?}", backup));
    Ok(())
}

/// Write the default configuration template
pub fn config_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        print_info("Use --force to overwrite");
        anyhow::bail!("Config file already exists: {:?}", config_path);
    }

    config::write_default_config(config_path)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    print_success(&format!("Created configuration file: {:?}", config_path));
    Ok(())
}
