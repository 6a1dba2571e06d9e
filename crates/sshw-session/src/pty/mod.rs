//! Interactive PTY sessions
//!
//! A session owns the shell channel in a single foreground loop. Three
//! background tasks feed it for the session's lifetime: the input relay,
//! the resize watch and the keepalive. All three are scoped to a
//! cancellation token that fires as soon as the foreground loop returns.

mod channel;
mod controller;
mod input;
mod keepalive;
mod resize;
mod terminal;

pub use channel::{Connection, ShellChannel, ShellOutput};
pub use controller::{SessionController, SessionEnd};
pub use input::{read_stdin_timeout, InputEvent, InputSource, StdinSource, INPUT_POLL_INTERVAL};
pub use keepalive::{keepalive_loop, KEEPALIVE_INTERVAL};
pub use resize::{watch_resize, ResizeTracker, RESIZE_INTERVAL};
pub use terminal::{CrosstermTerminal, LocalTerminal, TerminalSize, TERMINAL_SPEED, TERMINAL_TYPE};
