//! Menu row decorations

use crossterm::style::{Color, StyledContent, Stylize};

use super::{MenuItem, PARENT_LABEL, PARENT_NAME};

const ALIAS_COLOR: Color = Color::Rgb {
    r: 0xDB,
    g: 0xAB,
    b: 0x79,
};
const ADDRESS_COLOR: Color = Color::Rgb {
    r: 0x71,
    g: 0xBE,
    b: 0xF2,
};
const PARENT_COLOR: Color = Color::Rgb {
    r: 0x58,
    g: 0x58,
    b: 0x58,
};

/// Row text without styling: `name(alias) user@host`
pub fn plain_label(item: &MenuItem) -> String {
    styled_label(item)
        .iter()
        .map(|part| part.content().as_str())
        .collect()
}

/// Row split into styled parts.
///
/// Aliases are yellow and wrapped in parentheses, `user@host` is blue (the
/// `user@` part only when a user is configured), and the parent entry is
/// grey italic.
pub fn styled_label(item: &MenuItem) -> Vec<StyledContent<String>> {
    match item {
        MenuItem::Group { name } => vec![name.clone().stylize()],
        MenuItem::Parent => vec![format!("{} {}", PARENT_NAME, PARENT_LABEL)
            .with(PARENT_COLOR)
            .italic()],
        MenuItem::Target {
            name,
            alias,
            user,
            host,
        } => {
            let mut parts = vec![name.clone().stylize()];
            if let Some(alias) = alias {
                parts.push(format!("({})", alias).with(ALIAS_COLOR));
            }
            if !host.is_empty() {
                let address = match user {
                    Some(user) => format!("{}@{}", user, host),
                    None => host.clone(),
                };
                parts.push(" ".to_string().stylize());
                parts.push(address.with(ADDRESS_COLOR));
            }
            parts
        }
    }
}
