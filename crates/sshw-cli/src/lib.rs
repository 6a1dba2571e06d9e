//! sshw: interactive SSH host launcher
//!
//! Library half of the `sshw` binary: the target picker, the interactive run
//! loop, the non-interactive subcommands and terminal output helpers.

pub mod commands;
pub mod output;
pub mod picker;
pub mod run_loop;

pub use run_loop::run_interactive_session;
