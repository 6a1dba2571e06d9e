//! Terminal output: status lines and the target overview table

use std::io::Write;

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use sshw_core::{Config, Target};
use tabled::{
    settings::{Style, Width},
    Table, Tabled,
};

/// ANSI sequence moving the cursor home and clearing the screen
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// Clear the screen
pub fn clear_screen() {
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(CLEAR_SCREEN.as_bytes());
    let _ = stdout.flush();
}

fn print_status(out: &mut impl Write, color: Color, symbol: &str, msg: &str) {
    let _ = crossterm::execute!(
        out,
        SetForegroundColor(color),
        Print(symbol),
        Print(" "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Green check on stdout
pub fn print_success(msg: &str) {
    print_status(&mut std::io::stdout(), Color::Green, "✓", msg);
}

/// Cyan info mark on stdout
pub fn print_info(msg: &str) {
    print_status(&mut std::io::stdout(), Color::Cyan, "ℹ", msg);
}

/// Yellow warning on stderr
pub fn print_warning(msg: &str) {
    print_status(&mut std::io::stderr(), Color::Yellow, "⚠", msg);
}

/// Red cross on stderr
pub fn print_error(msg: &str) {
    print_status(&mut std::io::stderr(), Color::Red, "✗", msg);
}

/// Which credentials a target carries, without revealing them
fn auth_summary(target: &Target) -> String {
    let mut kinds = Vec::with_capacity(3);
    kinds.push(if target.key_path().is_some() {
        "key"
    } else {
        "default-key"
    });
    if target.password().is_some() {
        kinds.push("password");
    }
    kinds.push("interactive");
    kinds.join(",")
}

/// Format every target of every group as a table.
///
/// `long` adds the alias and a credential summary (never the secrets).
pub fn format_targets(config: &Config, long: bool) -> String {
    if config.target_count() == 0 {
        return "No targets configured".to_string();
    }

    #[derive(Tabled)]
    struct TargetRow {
        #[tabled(rename = "GROUP")]
        group: String,
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "USER")]
        user: String,
        #[tabled(rename = "HOST")]
        host: String,
        #[tabled(rename = "PORT")]
        port: u16,
    }

    #[derive(Tabled)]
    struct TargetRowLong {
        #[tabled(rename = "GROUP")]
        group: String,
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "ALIAS")]
        alias: String,
        #[tabled(rename = "USER")]
        user: String,
        #[tabled(rename = "HOST")]
        host: String,
        #[tabled(rename = "PORT")]
        port: u16,
        #[tabled(rename = "AUTH")]
        auth: String,
    }

    let targets = config
        .groups
        .iter()
        .flat_map(|g| g.targets.iter().map(move |t| (g.name.as_str(), t)));

    if long {
        let rows: Vec<TargetRowLong> = targets
            .map(|(group, t)| TargetRowLong {
                group: group.to_string(),
                name: t.name.clone(),
                alias: t.alias().unwrap_or("-").to_string(),
                user: t.effective_user().to_string(),
                host: t.host.clone(),
                port: t.effective_port(),
                auth: auth_summary(t),
            })
            .collect();

        Table::new(rows)
            .with(Style::rounded())
            .with(Width::wrap(120))
            .to_string()
    } else {
        let rows: Vec<TargetRow> = targets
            .map(|(group, t)| TargetRow {
                group: group.to_string(),
                name: t.name.clone(),
                user: t.effective_user().to_string(),
                host: t.host.clone(),
                port: t.effective_port(),
            })
            .collect();

        Table::new(rows).with(Style::rounded()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sshw_core::TargetGroup;

    fn config() -> Config {
        Config::new(vec![TargetGroup::new(
            "prod",
            vec![
                Target {
                    password: Some("hunter2".into()),
                    ..Target::new("web1", "10.0.0.5")
                },
                Target {
                    alias: Some("db".into()),
                    user: Some("postgres".into()),
                    port: Some(2222),
                    key_path: Some("~/.ssh/id_ed25519".into()),
                    ..Target::new("db1", "10.0.0.9")
                },
            ],
        )])
    }

    #[test]
    fn test_table_shows_effective_values() {
        let table = format_targets(&config(), false);
        assert!(table.contains("web1"));
        assert!(table.contains("root"));
        assert!(table.contains("22"));
        assert!(table.contains("postgres"));
        assert!(table.contains("2222"));
        assert!(!table.contains("ALIAS"));
    }

    #[test]
    fn test_long_table_never_shows_secrets() {
        let table = format_targets(&config(), true);
        assert!(table.contains("ALIAS"));
        assert!(table.contains("password"));
        assert!(!table.contains("hunter2"));
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(format_targets(&Config::default(), false), "No targets configured");
    }

    #[test]
    fn test_auth_summary() {
        let config = config();
        assert_eq!(
            auth_summary(&config.groups[0].targets[0]),
            "default-key,password,interactive"
        );
        assert_eq!(auth_summary(&config.groups[0].targets[1]), "key,interactive");
    }
}
