//! sshw-session: interactive SSH session engine
//!
//! Resolves credentials for a [`Target`](sshw_core::Target), dials it with a
//! one-shot password fallback, and attaches the local terminal to a remote
//! shell for the lifetime of the session.

pub mod auth;
pub mod error;
pub mod pty;
pub mod transport;

pub use auth::{AuthMethod, CredentialResolver, Prompter, TerminalPrompter};
pub use error::{DialError, SessionError};
pub use pty::{SessionController, SessionEnd};
pub use transport::{connect, Dialer, RusshConnection, RusshDialer, SessionContext};
