//! Secret references in configuration values.
//!
//! Credential fields in `config.toml` may point at a secret instead of
//! holding it:
//!
//! - `pass::path/in/store` runs `pass show path/in/store` and keeps the first line
//! - `env::VAR_NAME` reads `$VAR_NAME`
//! - anything else is the secret itself

use std::process::Command;

/// A configuration value, classified by where its secret lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretRef<'a> {
    /// Entry in the `pass` password store.
    Pass(&'a str),
    /// Environment variable.
    Env(&'a str),
    /// Inline value.
    Plain(&'a str),
}

impl<'a> SecretRef<'a> {
    /// Classifies a raw configuration value.
    pub fn parse(value: &'a str) -> Self {
        if let Some(path) = value.strip_prefix("pass::") {
            Self::Pass(path)
        } else if let Some(var) = value.strip_prefix("env::") {
            Self::Env(var)
        } else {
            Self::Plain(value)
        }
    }

    /// Fetches the secret.
    pub fn resolve(&self) -> Result<String, String> {
        match *self {
            Self::Pass(path) => read_pass(path),
            Self::Env(var) => std::env::var(var)
                .map_err(|_| format!("environment variable `{}` is not set", var)),
            Self::Plain(value) => Ok(value.to_string()),
        }
    }

    /// Returns a form safe to print: references as written, inline values masked.
    pub fn redacted(&self) -> String {
        match *self {
            Self::Pass(path) => format!("pass::{}", path),
            Self::Env(var) => format!("env::{}", var),
            Self::Plain("") => String::new(),
            Self::Plain(_) => "********".to_string(),
        }
    }
}

/// Resolves a value that may be a secret reference.
pub fn resolve(value: &str) -> Result<String, String> {
    SecretRef::parse(value).resolve()
}

fn read_pass(path: &str) -> Result<String, String> {
    let output = Command::new("pass")
        .args(["show", path])
        .output()
        .map_err(|e| format!("failed to run `pass show {}`: {}", path, e))?;

    if !output.status.success() {
        return Err(format!(
            "`pass show {}` failed ({}): {}",
            path,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| format!("`pass show {}` produced no output", path))
}
