use anyhow::{Context, Result};

use crate::error::TournamentError;

/// Check a supplied code against the configured one.
/// With no code configured every mutation is allowed.
pub fn verify_code(expected: Option<&str>, supplied: Option<&str>) -> Result<(), TournamentError> {
    match expected {
        None => Ok(()),
        Some(expected) => match supplied {
            Some(code) if code.trim() == expected => Ok(()),
            _ => Err(TournamentError::AccessDenied),
        },
    }
}

/// Prompt for the access code without echoing it
pub fn prompt_for_code(action: &str) -> Result<String> {
    let code = rpassword::prompt_password(format!("Access code to {}: ", action))
        .context("Failed to read access code from stdin")?;
    Ok(code.trim().to_string())
}

/// Resolve the code for a mutating command: the `--code` flag wins, otherwise the
/// user is prompted, but only when a code is actually required.
pub fn authorize(expected: Option<&str>, flag: Option<String>, action: &str) -> Result<()> {
    if expected.is_none() {
        return Ok(());
    }
    let supplied = match flag {
        Some(code) => code,
        None => prompt_for_code(action)?,
    };
    verify_code(expected, Some(&supplied))?;
    Ok(())
}
