//! Local terminal state: raw mode and geometry

use std::io;

/// Terminal type requested for the remote PTY
pub const TERMINAL_TYPE: &str = "xterm";

/// Line speed advertised in the PTY modes (input and output)
pub const TERMINAL_SPEED: u32 = 14400;

/// Terminal dimensions in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub cols: u16,
    pub rows: u16,
}

impl TerminalSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

impl From<(u16, u16)> for TerminalSize {
    fn from((cols, rows): (u16, u16)) -> Self {
        Self::new(cols, rows)
    }
}

/// The controlling terminal the session is attached to
pub trait LocalTerminal: Send + Sync + 'static {
    /// Switch to raw mode
    fn enable_raw_mode(&self) -> io::Result<()>;

    /// Restore the mode in effect before [`enable_raw_mode`](Self::enable_raw_mode)
    fn disable_raw_mode(&self) -> io::Result<()>;

    /// Current dimensions
    fn size(&self) -> io::Result<TerminalSize>;
}

/// Terminal driven through crossterm.
///
/// crossterm saves the original termios on entry to raw mode and restores it
/// on exit. On Windows it measures the console screen buffer behind standard
/// output, which is the handle that reflects the real geometry there.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermTerminal;

impl LocalTerminal for CrosstermTerminal {
    fn enable_raw_mode(&self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn disable_raw_mode(&self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }

    fn size(&self) -> io::Result<TerminalSize> {
        crossterm::terminal::size().map(TerminalSize::from)
    }
}
