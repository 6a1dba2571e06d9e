//! Interactive session mode: pick a target, run its shell, repeat
//!
//! The loop ends when the picker is cancelled, when `q`/`Q` or end-of-input
//! shows up on stdin right after a pick, or when the process receives an
//! interrupt or termination signal. Failures of a single session only send
//! the user back to the menu.

use std::fmt;
use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;

use crate::output::{clear_screen, print_error};
use crate::picker::{choose, TerminalSelector};
use sshw_core::{Config, Target};
use sshw_session::{
    connect, CredentialResolver, Prompter, RusshDialer, SessionController, TerminalPrompter,
};

/// Shown above the menu on every iteration
pub const NAV_HINT: &str =
    "Press \"Ctrl+C\" and then press \"q | Q\" or \"Ctrl+D\" to exit, or select the SSH target:";

/// Printed when a session returns control to the menu
pub const SESSION_ENDED: &str = "SSH session ended, returning to main menu...";

/// Why the process is leaving interactive mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Farewell {
    Signal,
    EndOfInput,
    QuitKey,
}

impl fmt::Display for Farewell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Signal => "Received termination signal",
            Self::EndOfInput => "Received Ctrl+D",
            Self::QuitKey => "Received input q",
        };
        write!(f, "{}, sshw:: Exiting...", reason)
    }
}

/// Decide whether bytes read from stdin ask to quit.
///
/// An empty read is end-of-input, as is a raw Ctrl+D byte from a console
/// that has no end-of-file.
pub fn quit_reason(input: &[u8]) -> Option<Farewell> {
    match input.first() {
        None | Some(0x04) => Some(Farewell::EndOfInput),
        Some(b'q') | Some(b'Q') => Some(Farewell::QuitKey),
        Some(_) => None,
    }
}

/// Run the menu/session loop over `config` until the user quits
pub async fn run_interactive_session(config: Config) -> Result<()> {
    tokio::spawn(exit_on_signal());

    let config = Arc::new(config);
    let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter);
    let resolver = Arc::new(CredentialResolver::new(Arc::clone(&prompter)));
    let dialer = RusshDialer::new(Arc::clone(&prompter));
    let controller = SessionController::default();

    loop {
        clear_screen();
        println!("{}", NAV_HINT);

        let target = match pick(Arc::clone(&config)).await? {
            Some(target) => target,
            None => {
                println!("Operation cancelled");
                return Ok(());
            }
        };

        if let Some(farewell) = poll_quit().await {
            println!("\n{}", farewell);
            return Ok(());
        }

        let methods = {
            let resolver = Arc::clone(&resolver);
            let target = target.clone();
            tokio::task::spawn_blocking(move || resolver.resolve(&target))
                .await
                .context("Credential resolution task failed")?
        };

        let conn = match connect(&dialer, &target, methods, Arc::clone(&prompter)).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(target_name = %target.name, "Dial failed: {}", e);
                print_error(&format!("{}: {}", target.name, e));
                println!("Press any key to return to the menu...");
                if let Err(e) = tokio::task::spawn_blocking(wait_for_key).await? {
                    tracing::warn!("Failed to wait for a key press: {}", e);
                }
                continue;
            }
        };

        println!("{}", banner(&target));

        let outcome = controller
            .login(Arc::new(conn), &target, || {
                println!("{}", SESSION_ENDED);
                clear_screen();
            })
            .await;
        if let Err(e) = outcome {
            tracing::debug!("Back to the menu after session error: {}", e);
        }
    }
}

/// `connect server ssh -p <port> <user>@<host>`
fn banner(target: &Target) -> String {
    format!(
        "connect server ssh -p {} {}@{}",
        target.effective_port(),
        target.effective_user(),
        target.host
    )
}

async fn pick(config: Arc<Config>) -> Result<Option<Target>> {
    tokio::task::spawn_blocking(move || choose(&config, &mut TerminalSelector))
        .await
        .context("Picker task failed")?
        .context("Target picker failed")
}

/// Single 100ms look at stdin for a quit key or end-of-input
async fn poll_quit() -> Option<Farewell> {
    use sshw_session::pty::{read_stdin_timeout, INPUT_POLL_INTERVAL};

    let polled = tokio::task::spawn_blocking(|| {
        let mut buf = [0u8; 64];
        read_stdin_timeout(&mut buf, INPUT_POLL_INTERVAL)
            .map(|read| read.and_then(|n| quit_reason(&buf[..n])))
    })
    .await;

    match polled {
        Ok(Ok(farewell)) => farewell,
        Ok(Err(e)) => {
            tracing::warn!("Failed to poll stdin: {}", e);
            None
        }
        Err(e) => {
            tracing::warn!("Stdin poll task failed: {}", e);
            None
        }
    }
}

/// Block until any key is pressed
fn wait_for_key() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let result = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(()),
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };
    terminal::disable_raw_mode()?;
    result
}

/// Exit the process on Ctrl+C or SIGTERM, even mid-session
async fn exit_on_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    let _ = terminal::disable_raw_mode();
    println!("\n{}", Farewell::Signal);
    std::process::exit(0);
}
