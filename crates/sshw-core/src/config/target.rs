//! Host tree: groups of SSH targets

use serde::{Deserialize, Serialize};
use std::fmt;

/// User assumed when a target does not name one
pub const DEFAULT_USER: &str = "root";

/// Port assumed when a target does not name one
pub const DEFAULT_PORT: u16 = 22;

/// Full host tree loaded from the config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Groups in menu display order
    #[serde(default, alias = "nodes")]
    pub groups: Vec<TargetGroup>,
}

impl Config {
    /// Create a config from a list of groups
    pub fn new(groups: Vec<TargetGroup>) -> Self {
        Self { groups }
    }

    /// Total number of targets across all groups
    pub fn target_count(&self) -> usize {
        self.groups.iter().map(|g| g.targets.len()).sum()
    }

    /// Copy of this config with passwords and passphrases blanked out
    pub fn redacted(&self) -> Self {
        let groups = self
            .groups
            .iter()
            .map(|group| TargetGroup {
                name: group.name.clone(),
                targets: group.targets.iter().map(Target::redacted).collect(),
            })
            .collect();
        Self { groups }
    }
}

/// Named, ordered collection of targets (one top-level menu entry)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetGroup {
    /// Group label
    #[serde(alias = "groups")]
    pub name: String,

    /// Targets in menu display order
    #[serde(default, alias = "ssh")]
    pub targets: Vec<Target>,
}

impl TargetGroup {
    /// Create a group
    pub fn new(name: impl Into<String>, targets: Vec<Target>) -> Self {
        Self {
            name: name.into(),
            targets,
        }
    }
}

/// One SSH-reachable endpoint
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Display label
    pub name: String,

    /// Optional short tag shown next to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// DNS name or IP address
    pub host: String,

    /// Login user (defaults to `root`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// SSH port (defaults to 22; 0 is treated as unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Private key path, `~` and `$HOME` prefixes allowed
    #[serde(default, alias = "keypath", skip_serializing_if = "Option::is_none")]
    pub key_path: Option<String>,

    /// Passphrase for the private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,

    /// Plaintext password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Target {
    /// Create a target with only the required fields set
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            ..Default::default()
        }
    }

    /// Login user, falling back to `root`
    pub fn effective_user(&self) -> &str {
        non_empty(&self.user).unwrap_or(DEFAULT_USER)
    }

    /// SSH port, falling back to 22
    pub fn effective_port(&self) -> u16 {
        match self.port {
            Some(port) if port != 0 => port,
            _ => DEFAULT_PORT,
        }
    }

    /// `host:port` pair used for dialing
    pub fn address(&self) -> (String, u16) {
        (self.host.clone(), self.effective_port())
    }

    /// Alias, if set and non-empty
    pub fn alias(&self) -> Option<&str> {
        non_empty(&self.alias)
    }

    /// User as written in the config, if set and non-empty
    pub fn configured_user(&self) -> Option<&str> {
        non_empty(&self.user)
    }

    /// Key path as written in the config, if set and non-empty
    pub fn key_path(&self) -> Option<&str> {
        non_empty(&self.key_path)
    }

    /// Key passphrase, if set and non-empty
    pub fn passphrase(&self) -> Option<&str> {
        non_empty(&self.passphrase)
    }

    /// Password, if set and non-empty
    pub fn password(&self) -> Option<&str> {
        non_empty(&self.password)
    }

    fn redacted(&self) -> Self {
        let mask = |value: &Option<String>| non_empty(value).map(|_| "********".to_string());
        Self {
            passphrase: mask(&self.passphrase),
            password: mask(&self.password),
            ..self.clone()
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("host", &self.host)
            .field("user", &self.user)
            .field("port", &self.port)
            .field("key_path", &self.key_path)
            .field("passphrase", &self.passphrase().map(|_| "<redacted>"))
            .field("password", &self.password().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let target = Target::new("web1", "10.0.0.5");
        assert_eq!(target.effective_user(), "root");
        assert_eq!(target.effective_port(), 22);
    }

    #[test]
    fn test_empty_user_and_zero_port_fall_back() {
        let target = Target {
            user: Some(String::new()),
            port: Some(0),
            ..Target::new("web1", "10.0.0.5")
        };
        assert_eq!(target.effective_user(), "root");
        assert_eq!(target.effective_port(), 22);
    }

    #[test]
    fn test_explicit_port_kept() {
        for port in [1u16, 22, 2222, 65535] {
            let target = Target {
                port: Some(port),
                ..Target::new("web1", "10.0.0.5")
            };
            assert_eq!(target.effective_port(), port);
        }
    }

    #[test]
    fn test_address() {
        let target = Target {
            port: Some(2200),
            ..Target::new("db", "db.internal")
        };
        assert_eq!(target.address(), ("db.internal".to_string(), 2200));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let target = Target {
            password: Some("secret".into()),
            passphrase: Some("hunter2".into()),
            ..Target::new("web1", "10.0.0.5")
        };
        let rendered = format!("{:?}", target);
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_redacted_masks_only_present_secrets() {
        let config = Config::new(vec![TargetGroup::new(
            "prod",
            vec![Target {
                password: Some("secret".into()),
                ..Target::new("web1", "10.0.0.5")
            }],
        )]);
        let redacted = config.redacted();
        let target = &redacted.groups[0].targets[0];
        assert_eq!(target.password.as_deref(), Some("********"));
        assert_eq!(target.passphrase, None);
    }

    #[test]
    fn test_legacy_field_names() {
        let raw = r#"
            [[nodes]]
            groups = "prod"

            [[nodes.ssh]]
            name = "web1"
            host = "10.0.0.5"
            keypath = "~/.ssh/id_ed25519"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.groups[0].name, "prod");
        assert_eq!(
            config.groups[0].targets[0].key_path(),
            Some("~/.ssh/id_ed25519")
        );
    }
}
