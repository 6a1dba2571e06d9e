//! Drives one interactive shell session from setup to teardown

use std::io::Write;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::channel::{Connection, ShellChannel, ShellOutput};
use super::input::{InputEvent, InputSource, StdinSource};
use super::keepalive::keepalive_loop;
use super::resize::watch_resize;
use super::terminal::{CrosstermTerminal, LocalTerminal, TerminalSize, TERMINAL_TYPE};
use crate::error::SessionError;
use sshw_core::Target;

const INPUT_CHANNEL_CAPACITY: usize = 64;
const RESIZE_CHANNEL_CAPACITY: usize = 4;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Remote side closed the channel
    RemoteClosed {
        /// Exit status, if the remote process reported one
        exit_status: Option<u32>,
    },
    /// Local input reached EOF
    InputClosed,
}

/// Attaches the local terminal to remote shells
pub struct SessionController {
    terminal: Arc<dyn LocalTerminal>,
    input: Arc<dyn InputSource>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(Arc::new(CrosstermTerminal), Arc::new(StdinSource))
    }
}

impl SessionController {
    pub fn new(terminal: Arc<dyn LocalTerminal>, input: Arc<dyn InputSource>) -> Self {
        Self { terminal, input }
    }

    /// Run one interactive session on `conn`.
    ///
    /// `on_session_end` is invoked exactly once, as the last step, whatever
    /// the outcome. Setup failures are reported on stderr and returned; the
    /// terminal mode is restored and the connection closed on every path.
    pub async fn login<C, F>(
        &self,
        conn: Arc<C>,
        target: &Target,
        on_session_end: F,
    ) -> Result<SessionEnd, SessionError>
    where
        C: Connection,
        F: FnOnce(),
    {
        tracing::info!(target_name = %target.name, host = %target.host, "Starting interactive session");
        let result = self.run(&conn).await;
        match &result {
            Ok(end) => tracing::info!(target_name = %target.name, "Session ended: {:?}", end),
            Err(e) => tracing::error!(target_name = %target.name, "Session failed: {}", e),
        }

        if let Err(e) = conn.close().await {
            tracing::debug!("Connection close: {}", e);
        }
        if let Err(e) = &result {
            eprintln!("{}", e);
        }

        on_session_end();
        result
    }

    async fn run<C: Connection>(&self, conn: &Arc<C>) -> Result<SessionEnd, SessionError> {
        let mut channel = conn.open_session().await?;

        if let Err(e) = self.terminal.enable_raw_mode() {
            if let Err(e) = channel.close().await {
                tracing::debug!("Channel close: {}", e);
            }
            return Err(SessionError::RawMode(e));
        }

        let result = self.attach(conn, &mut channel).await;

        if let Err(e) = self.terminal.disable_raw_mode() {
            tracing::warn!("Failed to restore terminal mode: {}", e);
        }
        if let Err(e) = channel.close().await {
            tracing::debug!("Channel close: {}", e);
        }
        result
    }

    async fn attach<C: Connection>(
        &self,
        conn: &Arc<C>,
        channel: &mut C::Channel,
    ) -> Result<SessionEnd, SessionError> {
        let size = self.terminal.size().map_err(SessionError::TerminalSize)?;
        channel.request_pty(TERMINAL_TYPE, size).await?;
        channel.request_shell().await?;
        tracing::debug!("Shell started on {}x{} {}", size.cols, size.rows, TERMINAL_TYPE);

        let cancel = CancellationToken::new();
        let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let (resize_tx, resize_rx) = mpsc::channel(RESIZE_CHANNEL_CAPACITY);

        let input_task = self.input.spawn(input_tx, cancel.child_token());
        let resize_task = tokio::spawn(watch_resize(
            Arc::clone(&self.terminal),
            size,
            resize_tx,
            cancel.child_token(),
        ));
        let keepalive_task = tokio::spawn(keepalive_loop(Arc::clone(conn), cancel.child_token()));

        let result = relay(channel, input_rx, resize_rx).await;

        cancel.cancel();
        for task in [resize_task, keepalive_task] {
            if let Err(e) = task.await {
                tracing::debug!("Background task ended abnormally: {}", e);
            }
        }
        // stdin is polled in short slices, so the relay sees cancellation quickly
        if let Err(e) = input_task.await {
            tracing::debug!("Input relay ended abnormally: {}", e);
        }

        result
    }
}

/// Pump remote output to the local streams and local input to the remote
/// side until either end closes.
async fn relay<Ch: ShellChannel>(
    channel: &mut Ch,
    mut input_rx: mpsc::Receiver<InputEvent>,
    mut resize_rx: mpsc::Receiver<TerminalSize>,
) -> Result<SessionEnd, SessionError> {
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let mut exit_status = None;
    let mut resizing = true;

    loop {
        tokio::select! {
            output = channel.next_output() => match output {
                Some(ShellOutput::Stdout(data)) => {
                    stdout.write_all(&data)?;
                    stdout.flush()?;
                }
                Some(ShellOutput::Stderr(data)) => {
                    stderr.write_all(&data)?;
                    stderr.flush()?;
                }
                Some(ShellOutput::ExitStatus(code)) => {
                    tracing::debug!("Remote process exited with {}", code);
                    exit_status = Some(code);
                }
                Some(ShellOutput::Eof) => {}
                Some(ShellOutput::Closed) | None => {
                    return Ok(SessionEnd::RemoteClosed { exit_status });
                }
            },

            event = input_rx.recv() => match event {
                Some(InputEvent::Data(data)) => channel.send_data(&data).await?,
                Some(InputEvent::Failed(e)) => {
                    tracing::error!("Input relay failed: {}", e);
                    eprint!("{}\r\n", e);
                    if let Err(e) = channel.eof().await {
                        tracing::debug!("Channel eof: {}", e);
                    }
                    return Ok(SessionEnd::InputClosed);
                }
                Some(InputEvent::Eof) | None => {
                    if let Err(e) = channel.eof().await {
                        tracing::debug!("Channel eof: {}", e);
                    }
                    return Ok(SessionEnd::InputClosed);
                }
            },

            size = resize_rx.recv(), if resizing => match size {
                Some(size) => {
                    if let Err(e) = channel.window_change(size).await {
                        tracing::debug!("Window change failed: {}", e);
                        resizing = false;
                    }
                }
                None => resizing = false,
            },
        }
    }
}
