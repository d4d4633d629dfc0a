//! Bearer token resolution for the likes walker.

use crate::CliError;

pub const TOKEN_ENV: &str = "DECANT_TOKEN";

/// Resolve the API token: `--token` flag > `DECANT_TOKEN` > token file.
/// Values are trimmed; an empty source falls through to the next one.
pub fn resolve_token(flag: Option<String>, token_file: &str) -> Result<String, CliError> {
    resolve_from(flag, TOKEN_ENV, token_file)
}

fn resolve_from(flag: Option<String>, env_var: &str, token_file: &str) -> Result<String, CliError> {
    if let Some(token) = flag {
        let trimmed = token.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }

    if let Ok(token) = std::env::var(env_var) {
        let trimmed = token.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }

    let path = shellexpand::tilde(token_file).to_string();
    if let Ok(contents) = std::fs::read_to_string(&path) {
        let trimmed = contents.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }

    Err(CliError::fetch(format!(
        "no API token found (use --token, set {env_var}, or write {path})",
    )))
}
