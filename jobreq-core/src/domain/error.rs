//! Error classification shared by every stage

use serde::{Deserialize, Serialize};

/// Kind of failure a stage or a single item can end in
///
/// `AlreadySatisfied` is listed here because the remote reports it through an
/// error status, but it is a steady-state outcome and never counts as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credential file missing or malformed, or invalid settings
    Config,
    /// Network, DNS or timeout failure
    Transport,
    /// 401/403 from the server
    Auth,
    /// Malformed JSON or a missing expected field
    Parse,
    /// Requirement already present on the job (400 on apply)
    AlreadySatisfied,
    /// Any other non-2xx response
    Remote,
    /// Work abandoned because the run was cancelled
    Cancelled,
}

impl ErrorKind {
    /// Whether an item ending in this kind should be counted as failed
    pub fn is_failure(&self) -> bool {
        !matches!(self, ErrorKind::AlreadySatisfied)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Config => write!(f, "ConfigError"),
            ErrorKind::Transport => write!(f, "TransportError"),
            ErrorKind::Auth => write!(f, "AuthError"),
            ErrorKind::Parse => write!(f, "ParseError"),
            ErrorKind::AlreadySatisfied => write!(f, "AlreadySatisfied"),
            ErrorKind::Remote => write!(f, "RemoteError"),
            ErrorKind::Cancelled => write!(f, "Cancelled"),
        }
    }
}
