//! CLI command implementations

mod config;
mod list;

pub use config::{config_backup, config_init, config_path, config_show, config_validate};
pub use list::list_command;
