//! Builds the ordered list of authentication methods offered for a target

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use russh_keys::key::KeyPair;
use sshw_core::paths;
use sshw_core::Target;

use super::prompt::Prompter;

/// One authentication method offered during the handshake
#[derive(Clone)]
pub enum AuthMethod {
    /// Private key signer
    PublicKey(Arc<KeyPair>),
    /// Plaintext password
    Password(String),
    /// Server-driven question/answer exchange, answered on the terminal
    KeyboardInteractive,
}

/// Method kind without the credential material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    PublicKey,
    Password,
    KeyboardInteractive,
}

impl AuthMethod {
    /// Kind of this method
    pub fn kind(&self) -> MethodKind {
        match self {
            Self::PublicKey(_) => MethodKind::PublicKey,
            Self::Password(_) => MethodKind::Password,
            Self::KeyboardInteractive => MethodKind::KeyboardInteractive,
        }
    }
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PublicKey(key) => write!(f, "PublicKey({})", key.name()),
            Self::Password(_) => f.write_str("Password(<redacted>)"),
            Self::KeyboardInteractive => f.write_str("KeyboardInteractive"),
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PublicKey => "publickey",
            Self::Password => "password",
            Self::KeyboardInteractive => "keyboard-interactive",
        })
    }
}

/// Resolves the authentication methods to offer for a target.
///
/// Order matters: the transport tries methods in sequence and stops at the
/// first one the server accepts. Missing or unreadable credentials are
/// logged and skipped, never fatal.
pub struct CredentialResolver {
    prompter: Arc<dyn Prompter>,
    default_key: Option<PathBuf>,
}

impl CredentialResolver {
    /// Create a resolver falling back to `~/.ssh/id_rsa`
    pub fn new(prompter: Arc<dyn Prompter>) -> Self {
        let default_key = paths::default_key_path()
            .map_err(|e| tracing::warn!("No default key path: {}", e))
            .ok();
        Self {
            prompter,
            default_key,
        }
    }

    /// Override the key tried when a target names none
    pub fn with_default_key(mut self, path: Option<PathBuf>) -> Self {
        self.default_key = path;
        self
    }

    /// Build the ordered method list: key, then password, then keyboard-interactive.
    ///
    /// Keyboard-interactive is always appended last, so the list is never empty.
    pub fn resolve(&self, target: &Target) -> Vec<AuthMethod> {
        let mut methods = Vec::with_capacity(3);

        if let Some(key) = self.load_key(target) {
            methods.push(AuthMethod::PublicKey(Arc::new(key)));
        }
        let have_key = !methods.is_empty();

        match target.password() {
            Some(password) => methods.push(AuthMethod::Password(password.to_string())),
            None if !have_key => {
                if let Some(password) = self.prompt_password(target) {
                    methods.push(AuthMethod::Password(password));
                }
            }
            None => {}
        }

        methods.push(AuthMethod::KeyboardInteractive);

        tracing::debug!(
            target_name = %target.name,
            methods = ?methods.iter().map(AuthMethod::kind).collect::<Vec<_>>(),
            "Resolved authentication methods"
        );
        methods
    }

    fn key_path(&self, target: &Target) -> Option<PathBuf> {
        match target.key_path() {
            Some(raw) => match paths::expand_home_dir(raw) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!("Cannot expand key path {}: {}", raw, e);
                    None
                }
            },
            None => self.default_key.clone(),
        }
    }

    fn load_key(&self, target: &Target) -> Option<KeyPair> {
        let path = self.key_path(target)?;

        let pem = match std::fs::read_to_string(&path) {
            Ok(pem) => pem,
            Err(e) => {
                tracing::warn!("Skipping key {:?}: {}", path, e);
                return None;
            }
        };

        match russh_keys::decode_secret_key(&pem, target.passphrase()) {
            Ok(key) => {
                tracing::debug!("Loaded {} key from {:?}", key.name(), path);
                Some(key)
            }
            Err(e) => {
                tracing::warn!("Skipping key {:?}: {}", path, e);
                None
            }
        }
    }

    fn prompt_password(&self, target: &Target) -> Option<String> {
        let prompt = format!("{}@{}'s password: ", target.effective_user(), target.host);
        match self.prompter.read_line(&prompt) {
            Ok(password) if !password.is_empty() => Some(password),
            Ok(_) => {
                tracing::warn!("No password entered; password fallback unavailable");
                None
            }
            Err(e) => {
                tracing::warn!("Failed to read password ({}); password fallback unavailable", e);
                None
            }
        }
    }
}
