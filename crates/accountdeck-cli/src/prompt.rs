//! Interactive input on the terminal.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use secrecy::SecretString;

/// Non-interactive password for `login` and `signup`.
pub const ENV_PASSWORD: &str = "ACCOUNTDECK_PASSWORD";
/// Non-interactive new password for `change-password`.
pub const ENV_NEW_PASSWORD: &str = "ACCOUNTDECK_NEW_PASSWORD";

/// Read one line from stdin. An empty answer yields `default` when given.
pub fn line(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(default) if !default.is_empty() => print!("{} [{}]: ", label, default),
        _ => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(resolve(&input, default))
}

fn resolve(input: &str, default: Option<&str>) -> String {
    let answer = input.trim_end_matches(['\r', '\n']);
    match default {
        Some(default) if answer.trim().is_empty() => default.to_string(),
        _ => answer.to_string(),
    }
}

/// Value passed on the command line, otherwise prompted.
pub fn value_or_prompt(value: Option<String>, label: &str, default: Option<&str>) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => line(label, default),
    }
}

/// Read a password without echo, or take it from `env_key` when set.
pub fn password(label: &str, env_key: Option<&str>) -> Result<SecretString> {
    if let Some(value) = env_key.and_then(|key| std::env::var(key).ok()) {
        return Ok(SecretString::from(value));
    }
    let value = rpassword::prompt_password(format!("{}: ", label))
        .context("Failed to read password")?;
    Ok(SecretString::from(value))
}

/// Yes/no question, defaulting to no.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = line(&format!("{} [y/N]", question), None)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
