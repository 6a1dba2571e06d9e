//! Home-directory expansion and config path resolution
//!
//! Paths in the config file are written by hand on several platforms, so both
//! `/` and `\` are accepted as separators after a `~` or `$HOME` prefix.

use std::path::{Path, PathBuf};

use crate::error::PathError;

/// File name of the default configuration, placed in the home directory
pub const DEFAULT_CONFIG_FILE: &str = ".sshw.toml";

/// Private key tried when a target does not name one
pub const DEFAULT_KEY_FILE: &str = ".ssh/id_rsa";

const HOME_PREFIXES: [&str; 2] = ["~", "$HOME"];

/// Home directory of the invoking user
pub fn home_dir() -> Result<PathBuf, PathError> {
    dirs::home_dir().ok_or(PathError::NoHomeDir)
}

/// Expand a leading `~` or `$HOME` to the invoking user's home directory.
///
/// See [`expand_home_dir_with`] for the exact rules.
pub fn expand_home_dir(path: &str) -> Result<PathBuf, PathError> {
    if !has_home_prefix(path) {
        return Ok(PathBuf::from(path));
    }
    Ok(expand_home_dir_with(path, &home_dir()?))
}

/// Expand a leading `~` or `$HOME` against `home`.
///
/// - `~` alone becomes `home`
/// - `~/rest` and `~\rest` become `home` joined with `rest`, with any remaining
///   backslashes turned into forward slashes
/// - `~user/rest` (no separator right after the prefix) is returned unchanged
///
/// The same rules apply to `$HOME`. Any other input is returned unchanged.
pub fn expand_home_dir_with(path: &str, home: &Path) -> PathBuf {
    for prefix in HOME_PREFIXES {
        let Some(rest) = path.strip_prefix(prefix) else {
            continue;
        };
        if rest.is_empty() {
            return home.to_path_buf();
        }
        return match rest.strip_prefix(['/', '\\']) {
            Some(rest) => home.join(rest.replace('\\', "/")),
            None => PathBuf::from(path),
        };
    }
    PathBuf::from(path)
}

fn has_home_prefix(path: &str) -> bool {
    HOME_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Default key path (`~/.ssh/id_rsa`)
pub fn default_key_path() -> Result<PathBuf, PathError> {
    Ok(home_dir()?.join(DEFAULT_KEY_FILE))
}

/// Default configuration file path (`~/.sshw.toml`)
pub fn default_config_path() -> Result<PathBuf, PathError> {
    Ok(home_dir()?.join(DEFAULT_CONFIG_FILE))
}

/// Resolve a user-supplied config path.
///
/// Backslashes are normalised to `/`. Home prefixes are expanded, absolute
/// paths (`/...` or a drive form like `D:/...`) are kept, anything else is
/// taken relative to the current directory.
pub fn resolve_config_path(raw: &str) -> Result<PathBuf, PathError> {
    let normalized = raw.replace('\\', "/");
    if has_home_prefix(&normalized) {
        return expand_home_dir(&normalized);
    }
    if normalized.starts_with('/') || normalized.contains(":/") {
        return Ok(PathBuf::from(normalized));
    }
    let cwd = std::env::current_dir().map_err(PathError::NoCurrentDir)?;
    Ok(cwd.join(normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> PathBuf {
        PathBuf::from("/home/tester")
    }

    #[test]
    fn test_plain_path_unchanged() {
        assert_eq!(
            expand_home_dir_with("/absolute/path/to/file", &home()),
            PathBuf::from("/absolute/path/to/file")
        );
    }

    #[test]
    fn test_tilde_alone_is_home() {
        assert_eq!(expand_home_dir_with("~", &home()), home());
    }

    #[test]
    fn test_tilde_forward_slash() {
        assert_eq!(
            expand_home_dir_with("~/.ssh/id_rsa", &home()),
            home().join(".ssh/id_rsa")
        );
    }

    #[test]
    fn test_tilde_backslash() {
        assert_eq!(
            expand_home_dir_with("~\\.ssh\\id_rsa", &home()),
            PathBuf::from("/home/tester/.ssh/id_rsa")
        );
    }

    #[test]
    fn test_tilde_username_unchanged() {
        assert_eq!(
            expand_home_dir_with("~username/path", &home()),
            PathBuf::from("~username/path")
        );
    }

    #[test]
    fn test_home_var_forms() {
        assert_eq!(expand_home_dir_with("$HOME", &home()), home());
        assert_eq!(
            expand_home_dir_with("$HOME/.ssh/id_rsa", &home()),
            home().join(".ssh/id_rsa")
        );
        assert_eq!(
            expand_home_dir_with("$HOME\\.ssh\\id_rsa", &home()),
            PathBuf::from("/home/tester/.ssh/id_rsa")
        );
        assert_eq!(
            expand_home_dir_with("$HOMEusername/path", &home()),
            PathBuf::from("$HOMEusername/path")
        );
    }

    #[test]
    fn test_expand_uses_real_home() {
        let Some(real_home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_home_dir("~").unwrap(), real_home);
        assert_eq!(
            expand_home_dir("~/.ssh/id_rsa").unwrap(),
            real_home.join(".ssh/id_rsa")
        );
    }

    #[test]
    fn test_resolve_absolute_and_drive_paths() {
        assert_eq!(
            resolve_config_path("/etc/sshw.toml").unwrap(),
            PathBuf::from("/etc/sshw.toml")
        );
        assert_eq!(
            resolve_config_path("D:\\mydata\\sshw.toml").unwrap(),
            PathBuf::from("D:/mydata/sshw.toml")
        );
    }

    #[test]
    fn test_resolve_relative_path() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            resolve_config_path("conf/sshw.toml").unwrap(),
            cwd.join("conf/sshw.toml")
        );
    }
}
