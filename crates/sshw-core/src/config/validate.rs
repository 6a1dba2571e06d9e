//! Validation of a parsed host tree

use std::path::Path;

use super::{Config, Target, TargetGroup};
use crate::error::ConfigError;
use crate::paths::expand_home_dir;

/// Check that a parsed config is usable by the picker and the session layer.
///
/// Rejects an empty tree, unnamed or empty groups, targets without a name or
/// host, and key paths that do not point at an existing file.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.groups.is_empty() {
        return Err(ConfigError::Invalid("no groups configured".to_string()));
    }

    for (index, group) in config.groups.iter().enumerate() {
        validate_group(group, index)?;
    }

    Ok(())
}

fn validate_group(group: &TargetGroup, index: usize) -> Result<(), ConfigError> {
    if group.name.trim().is_empty() {
        return Err(ConfigError::Invalid(format!(
            "group at index {} has an empty name",
            index
        )));
    }

    if group.targets.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "group '{}' has no targets configured",
            group.name
        )));
    }

    for (index, target) in group.targets.iter().enumerate() {
        validate_target(target, &group.name, index)?;
    }

    Ok(())
}

fn validate_target(target: &Target, group: &str, index: usize) -> Result<(), ConfigError> {
    if target.name.trim().is_empty() {
        return Err(ConfigError::Invalid(format!(
            "target at index {} in group '{}' has no name",
            index, group
        )));
    }

    if target.host.trim().is_empty() {
        return Err(ConfigError::Invalid(format!(
            "target '{}' in group '{}' has no host",
            target.name, group
        )));
    }

    if let Some(key_path) = target.key_path() {
        let expanded = expand_home_dir(&key_path.replace('\\', "/"))?;
        if !Path::new(&expanded).is_file() {
            return Err(ConfigError::Invalid(format!(
                "target '{}' in group '{}' key file not found: {}",
                target.name,
                group,
                expanded.display()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn single(target: Target) -> Config {
        Config::new(vec![TargetGroup::new("prod", vec![target])])
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&single(Target::new("web1", "10.0.0.5"))).is_ok());
    }

    #[test]
    fn test_empty_config_rejected() {
        let err = validate(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("no groups"));
    }

    #[test]
    fn test_empty_group_rejected() {
        let config = Config::new(vec![TargetGroup::new("prod", vec![])]);
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("'prod' has no targets"));
    }

    #[test]
    fn test_unnamed_group_rejected() {
        let config = Config::new(vec![TargetGroup::new(
            " ",
            vec![Target::new("web1", "10.0.0.5")],
        )]);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_missing_host_rejected() {
        let err = validate(&single(Target::new("web1", ""))).unwrap_err();
        assert!(err.to_string().contains("has no host"));
    }

    #[test]
    fn test_missing_key_file_rejected() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let target = Target {
            key_path: Some(missing.display().to_string()),
            ..Target::new("web1", "10.0.0.5")
        };
        let err = validate(&single(target)).unwrap_err();
        assert!(err.to_string().contains("key file not found"));
    }

    #[test]
    fn test_existing_key_file_accepted() {
        let dir = TempDir::new().unwrap();
        let key = dir.path().join("id_test");
        std::fs::write(&key, "not really a key").unwrap();
        let target = Target {
            key_path: Some(key.display().to_string()),
            ..Target::new("web1", "10.0.0.5")
        };
        assert!(validate(&single(target)).is_ok());
    }
}
