//! Local standard input polling and the session input relay

use std::io;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Slice the relay waits on stdin before re-checking for cancellation
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

const READ_BUFFER_SIZE: usize = 4096;

/// Event produced by an input source
#[derive(Debug)]
pub enum InputEvent {
    /// Bytes typed by the user
    Data(Vec<u8>),
    /// Input stream reached end-of-file (normal termination)
    Eof,
    /// Reading failed
    Failed(io::Error),
}

/// Source of bytes forwarded to the remote shell
pub trait InputSource: Send + Sync + 'static {
    /// Start relaying input into `tx` until EOF, failure or cancellation
    fn spawn(&self, tx: mpsc::Sender<InputEvent>, cancel: CancellationToken) -> JoinHandle<()>;
}

/// Relays the process's standard input
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl InputSource for StdinSource {
    fn spawn(&self, tx: mpsc::Sender<InputEvent>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::task::spawn_blocking(move || {
            let mut buf = [0u8; READ_BUFFER_SIZE];
            while !cancel.is_cancelled() {
                let event = match read_stdin_timeout(&mut buf, INPUT_POLL_INTERVAL) {
                    Ok(None) => continue,
                    Ok(Some(0)) => InputEvent::Eof,
                    Ok(Some(n)) => InputEvent::Data(buf[..n].to_vec()),
                    Err(e) => InputEvent::Failed(e),
                };
                let last = !matches!(event, InputEvent::Data(_));
                if tx.blocking_send(event).is_err() || last {
                    break;
                }
            }
            tracing::trace!("Input relay stopped");
        })
    }
}

/// Wait up to `timeout` for stdin to become readable, then read what is there.
///
/// Returns `Ok(None)` when nothing arrived in time and `Ok(Some(0))` on EOF.
#[cfg(unix)]
pub fn read_stdin_timeout(buf: &mut [u8], timeout: Duration) -> io::Result<Option<usize>> {
    let mut fds = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);

    // SAFETY: `fds` is a single valid pollfd for the duration of the call
    let ready = unsafe { libc::poll(&mut fds, 1, millis) };
    if ready < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(None);
        }
        return Err(err);
    }
    if ready == 0 {
        return Ok(None);
    }

    // SAFETY: `buf` is valid for writes of `buf.len()` bytes
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted || err.kind() == io::ErrorKind::WouldBlock {
            return Ok(None);
        }
        return Err(err);
    }
    Ok(Some(n as usize))
}

/// Wait up to `timeout` for a key press on the console and encode it as the
/// bytes a terminal would send.
///
/// Returns `Ok(None)` when no key arrived in time. Console input has no
/// end-of-file; Ctrl+D arrives as `0x04`.
#[cfg(not(unix))]
pub fn read_stdin_timeout(buf: &mut [u8], timeout: Duration) -> io::Result<Option<usize>> {
    use crossterm::event::{self, Event, KeyEventKind};

    if !event::poll(timeout)? {
        return Ok(None);
    }
    let bytes = match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Release => key_bytes(key),
        Event::Paste(text) => text.into_bytes(),
        _ => return Ok(None),
    };
    if bytes.is_empty() {
        return Ok(None);
    }

    let n = bytes.len().min(buf.len());
    buf[..n].copy_from_slice(&bytes[..n]);
    Ok(Some(n))
}

/// Terminal byte sequence for a key press, empty for keys with none
#[cfg_attr(unix, allow(dead_code))]
pub(crate) fn key_bytes(key: crossterm::event::KeyEvent) -> Vec<u8> {
    use crossterm::event::{KeyCode, KeyModifiers};

    const ESC: u8 = 0x1b;
    let csi = |tail: &[u8]| [&[ESC, b'['][..], tail].concat();

    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            match c.to_ascii_lowercase() {
                c @ 'a'..='z' => vec![c as u8 - b'a' + 1],
                '[' => vec![ESC],
                '\\' => vec![0x1c],
                ']' => vec![0x1d],
                ' ' | '@' => vec![0],
                _ => Vec::new(),
            }
        }
        KeyCode::Char(c) => {
            let mut bytes = Vec::with_capacity(5);
            if key.modifiers.contains(KeyModifiers::ALT) {
                bytes.push(ESC);
            }
            let mut utf8 = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            bytes
        }
        KeyCode::Enter => vec![b'\r'],
        KeyCode::Tab => vec![b'\t'],
        KeyCode::BackTab => csi(b"Z"),
        KeyCode::Backspace => vec![0x7f],
        KeyCode::Esc => vec![ESC],
        KeyCode::Up => csi(b"A"),
        KeyCode::Down => csi(b"B"),
        KeyCode::Right => csi(b"C"),
        KeyCode::Left => csi(b"D"),
        KeyCode::Home => csi(b"H"),
        KeyCode::End => csi(b"F"),
        KeyCode::Insert => csi(b"2~"),
        KeyCode::Delete => csi(b"3~"),
        KeyCode::PageUp => csi(b"5~"),
        KeyCode::PageDown => csi(b"6~"),
        KeyCode::F(n @ 1..=4) => vec![ESC, b'O', b'P' + (n - 1)],
        KeyCode::F(n) => match n {
            5 => csi(b"15~"),
            6 => csi(b"17~"),
            7 => csi(b"18~"),
            8 => csi(b"19~"),
            9 => csi(b"20~"),
            10 => csi(b"21~"),
            11 => csi(b"23~"),
            12 => csi(b"24~"),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Input source replaying a fixed list of events, then idling until cancelled
    #[derive(Default)]
    pub struct ScriptedInput {
        events: Mutex<Vec<InputEvent>>,
    }

    impl ScriptedInput {
        pub fn new(events: Vec<InputEvent>) -> Self {
            Self {
                events: Mutex::new(events),
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn spawn(&self, tx: mpsc::Sender<InputEvent>, cancel: CancellationToken) -> JoinHandle<()> {
            let events = std::mem::take(&mut *self.events.lock().unwrap());
            tokio::spawn(async move {
                for event in events {
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
                cancel.cancelled().await;
            })
        }
    }
}
