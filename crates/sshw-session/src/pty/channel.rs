//! Abstractions over an authenticated SSH connection and its shell channel

use async_trait::async_trait;

use super::terminal::TerminalSize;
use crate::error::SessionError;

/// Output delivered by the remote side of a shell channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutput {
    /// Bytes for local standard output
    Stdout(Vec<u8>),
    /// Bytes for local standard error
    Stderr(Vec<u8>),
    /// Remote process exit code
    ExitStatus(u32),
    /// Remote side will send no more data
    Eof,
    /// Channel closed
    Closed,
}

/// An authenticated connection able to host interactive sessions.
///
/// Shared between the foreground session loop and the liveness watch, so
/// every method takes `&self`.
#[async_trait]
pub trait Connection: Send + Sync + 'static {
    type Channel: ShellChannel;

    /// Open a new session channel
    async fn open_session(&self) -> Result<Self::Channel, SessionError>;

    /// Whether the transport has shut down, for example after unanswered keepalives
    fn is_closed(&self) -> bool;

    /// Tear down the connection
    async fn close(&self) -> Result<(), SessionError>;
}

/// A session channel carrying one interactive shell.
///
/// Owned by the foreground loop, which serialises every call on it.
#[async_trait]
pub trait ShellChannel: Send + 'static {
    /// Request a pseudo-terminal of type `term` with echo on and a fixed line speed
    async fn request_pty(&mut self, term: &str, size: TerminalSize) -> Result<(), SessionError>;

    /// Start the user's login shell
    async fn request_shell(&mut self) -> Result<(), SessionError>;

    /// Write bytes to the remote standard input
    async fn send_data(&mut self, data: &[u8]) -> Result<(), SessionError>;

    /// Notify the remote PTY of new dimensions
    async fn window_change(&mut self, size: TerminalSize) -> Result<(), SessionError>;

    /// Next piece of remote output, `None` once the channel is gone
    async fn next_output(&mut self) -> Option<ShellOutput>;

    /// Signal end of input
    async fn eof(&mut self) -> Result<(), SessionError>;

    /// Close the channel
    async fn close(&mut self) -> Result<(), SessionError>;
}
