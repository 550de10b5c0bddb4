//! Credential loading
//!
//! Reads the username/password pair used for every authenticated call from a
//! local `key=value` file. The read happens once per run and is never retried.

use jobreq_core::domain::Credentials;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default credential file, relative to the working directory
pub const DEFAULT_CREDENTIALS_PATH: &str = ".credentials";

/// Errors raised while loading credentials
///
/// Messages never include line contents, which may hold the password.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read credentials file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed line {line} in {path}: expected key=value")]
    MalformedLine { path: PathBuf, line: usize },

    #[error("Missing `{key}` in {path}")]
    MissingKey { path: PathBuf, key: &'static str },
}

/// Load credentials from `path`
pub fn load(path: &Path) -> Result<Credentials, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&contents, path)
}

/// Parse credential file contents
///
/// Each non-blank line is split on its first `=`, so values may themselves
/// contain `=`. Lines starting with `#` are comments. Later keys win.
pub fn parse(contents: &str, path: &Path) -> Result<Credentials, ConfigError> {
    let mut username = None;
    let mut password = None;

    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::MalformedLine {
            path: path.to_path_buf(),
            line: idx + 1,
        })?;

        match key.trim() {
            "username" => username = Some(value.to_string()),
            "password" => password = Some(value.to_string()),
            _ => {}
        }
    }

    let username = username.ok_or_else(|| ConfigError::MissingKey {
        path: path.to_path_buf(),
        key: "username",
    })?;
    let password = password.ok_or_else(|| ConfigError::MissingKey {
        path: path.to_path_buf(),
        key: "password",
    })?;

    Ok(Credentials::new(username, password))
}
