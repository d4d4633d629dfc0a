//! `decant-cli` — command layer over the blog archive reconciliation engine.
//!
//! The `decant` binary only parses arguments and dispatches; everything it
//! calls lives here so tests can drive command internals directly.

pub mod exit_codes;
pub mod likes;
pub mod migrate;
pub mod token;

use exit_codes::EXIT_ERROR;

/// Command-boundary error: an exit code plus what to print on stderr.
/// Usage errors never take this path; clap reports those itself.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
