//! Error types for dialing and driving SSH sessions

use thiserror::Error;

/// Marker the SSH layer uses when every offered authentication method was refused
const AUTH_EXHAUSTED_MARKER: &str = "no supported methods remain";

/// Failure to establish an authenticated connection
#[derive(Debug, Error)]
pub enum DialError {
    /// The server refused every authentication method offered
    #[error("ssh: handshake failed: no supported methods remain{}", password_note(.password_offered))]
    AuthExhausted {
        /// Whether a password method was among those refused
        password_offered: bool,
    },

    /// TCP connect or SSH handshake did not finish in time
    #[error("ssh: connection to {0} timed out")]
    Timeout(String),

    /// Any other transport or protocol failure
    #[error("{0}")]
    Transport(String),
}

fn password_note(password_offered: &bool) -> &'static str {
    if *password_offered {
        " (password rejected)"
    } else {
        ""
    }
}

impl DialError {
    /// Classify a free-text error message from an SSH layer.
    ///
    /// Messages reporting that no authentication methods remain become
    /// [`DialError::AuthExhausted`], with `password_offered` set when the
    /// message mentions a password. Everything else is a transport failure.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(AUTH_EXHAUSTED_MARKER) {
            return Self::AuthExhausted {
                password_offered: message.contains("password"),
            };
        }
        Self::Transport(message)
    }

    /// Whether the dial should be retried once with an interactively entered password
    pub fn wants_password_retry(&self) -> bool {
        matches!(
            self,
            Self::AuthExhausted {
                password_offered: false
            }
        )
    }
}

impl From<russh::Error> for DialError {
    fn from(err: russh::Error) -> Self {
        Self::classify(err.to_string())
    }
}

/// Failures that end the current interactive session (the process carries on)
#[derive(Debug, Error)]
pub enum SessionError {
    /// Opening the session channel failed
    #[error("Failed to open session channel: {0}")]
    ChannelOpen(String),

    /// Local terminal could not be switched to raw mode
    #[error("Failed to enter raw mode: {0}")]
    RawMode(#[source] std::io::Error),

    /// Local terminal size could not be read
    #[error("Failed to read terminal size: {0}")]
    TerminalSize(#[source] std::io::Error),

    /// Remote side refused the PTY request
    #[error("PTY request failed: {0}")]
    PtyRequest(String),

    /// Remote shell could not be started
    #[error("Failed to start shell: {0}")]
    ShellStart(String),

    /// Writing to the remote session failed
    #[error("Failed to write to session: {0}")]
    Write(String),

    /// Local I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session or connection already closed
    #[error("Session closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_exhausted_without_password_retries() {
        let err = DialError::classify("ssh: handshake failed: no supported methods remain");
        assert!(matches!(
            err,
            DialError::AuthExhausted {
                password_offered: false
            }
        ));
        assert!(err.wants_password_retry());
    }

    #[test]
    fn test_auth_exhausted_with_password_does_not_retry() {
        let err = DialError::classify(
            "ssh: handshake failed: ssh: unable to authenticate, attempted methods [none password], no supported methods remain",
        );
        assert!(!err.wants_password_retry());
    }

    #[test]
    fn test_connection_refused_does_not_retry() {
        let err = DialError::classify("dial tcp: connection refused");
        assert!(matches!(err, DialError::Transport(_)));
        assert!(!err.wants_password_retry());
    }

    #[test]
    fn test_display_classifies_back_to_same_variant() {
        for offered in [false, true] {
            let err = DialError::AuthExhausted {
                password_offered: offered,
            };
            let reclassified = DialError::classify(err.to_string());
            assert_eq!(reclassified.wants_password_retry(), err.wants_password_retry());
        }
    }

    #[test]
    fn test_timeout_does_not_retry() {
        assert!(!DialError::Timeout("10.0.0.5:22".into()).wants_password_retry());
    }
}
