//! Two-level target picker: groups, then the targets of one group
//!
//! The target level always starts with a synthetic parent entry at index 0.
//! Choosing it goes back to the group level; it is never returned as a
//! target.

mod render;
mod selector;

use std::io;

use sshw_core::{Config, Target, TargetGroup};

pub use render::{plain_label, styled_label};
pub use selector::TerminalSelector;

/// Reserved name of the "go back" entry
pub const PARENT_NAME: &str = "-parent-";

/// Label shown after [`PARENT_NAME`]
pub const PARENT_LABEL: &str = "(back)";

pub const GROUP_TITLE: &str = "Select SSH group";
pub const TARGET_TITLE: &str = "Select SSH target";

/// One row of a menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Group {
        name: String,
    },
    Parent,
    Target {
        name: String,
        alias: Option<String>,
        user: Option<String>,
        host: String,
    },
}

impl MenuItem {
    fn group(group: &TargetGroup) -> Self {
        Self::Group {
            name: group.name.clone(),
        }
    }

    fn target(target: &Target) -> Self {
        Self::Target {
            name: target.name.clone(),
            alias: target.alias().map(str::to_string),
            user: target.configured_user().map(str::to_string),
            host: target.host.clone(),
        }
    }
}

/// List-selection primitive shared by both menu levels
pub trait ListSelector {
    /// Show `items` under `title` and return the chosen index, or `None` if
    /// the user cancelled
    fn select(&mut self, title: &str, items: &[MenuItem]) -> io::Result<Option<usize>>;
}

/// Currently displayed menu level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuState {
    Groups,
    Targets(usize),
}

/// Group-level entries in config order
pub fn group_items(config: &Config) -> Vec<MenuItem> {
    config.groups.iter().map(MenuItem::group).collect()
}

/// Target-level entries: the parent entry followed by the group's targets
pub fn target_items(group: &TargetGroup) -> Vec<MenuItem> {
    std::iter::once(MenuItem::Parent)
        .chain(group.targets.iter().map(MenuItem::target))
        .collect()
}

/// Run the picker until a target is chosen or the user cancels.
///
/// Cancelling at either level ends the whole picker with `Ok(None)`.
pub fn choose<S>(config: &Config, selector: &mut S) -> io::Result<Option<Target>>
where
    S: ListSelector + ?Sized,
{
    let mut state = MenuState::Groups;

    loop {
        state = match state {
            MenuState::Groups => {
                match selector.select(GROUP_TITLE, &group_items(config))? {
                    Some(index) if index < config.groups.len() => MenuState::Targets(index),
                    Some(index) => {
                        tracing::warn!("Group index {} out of range", index);
                        MenuState::Groups
                    }
                    None => return Ok(None),
                }
            }
            MenuState::Targets(group_index) => {
                let group = &config.groups[group_index];
                match selector.select(TARGET_TITLE, &target_items(group))? {
                    Some(0) => MenuState::Groups,
                    Some(index) => match group.targets.get(index - 1) {
                        Some(target) => return Ok(Some(target.clone())),
                        None => {
                            tracing::warn!("Target index {} out of range", index);
                            MenuState::Targets(group_index)
                        }
                    },
                    None => return Ok(None),
                }
            }
        };
    }
}
