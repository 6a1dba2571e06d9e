//! Terminal prompts used during authentication

use std::io::{self, BufRead, Write};

/// Source of interactively entered credentials
pub trait Prompter: Send + Sync {
    /// Print `prompt` and read one echoed line
    fn read_line(&self, prompt: &str) -> io::Result<String>;

    /// Print `prompt` and read one line with terminal echo disabled
    fn read_secret(&self, prompt: &str) -> io::Result<String>;
}

/// Prompter bound to the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_line(&self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_secret(&self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}

/// One keyboard-interactive question from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Question text, printed as the prompt
    pub prompt: String,
    /// Whether the answer may be echoed
    pub echo: bool,
}

/// Answer keyboard-interactive questions in order.
///
/// Echoed questions read a plain line, the others read masked input. The
/// first read error aborts the whole exchange.
pub fn answer_challenges(
    prompter: &dyn Prompter,
    challenges: &[Challenge],
) -> io::Result<Vec<String>> {
    challenges
        .iter()
        .map(|challenge| {
            if challenge.echo {
                prompter.read_line(&challenge.prompt)
            } else {
                prompter.read_secret(&challenge.prompt)
            }
        })
        .collect()
}
