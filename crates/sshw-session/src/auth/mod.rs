//! Credential resolution and interactive prompts

mod prompt;
mod resolver;

pub use prompt::{answer_challenges, Challenge, Prompter, TerminalPrompter};
pub use resolver::{AuthMethod, CredentialResolver, MethodKind};

#[cfg(test)]
pub(crate) use prompt::testing;
