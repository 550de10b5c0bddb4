//! Error types for the Bamboo client

use jobreq_core::domain::ErrorKind;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the Bamboo REST API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived (DNS, connect, timeout)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Could not reach the server or build the HTTP client
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the server answered 400 Bad Request
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::ApiError { status: 400, .. })
    }

    /// Check if the server rejected the credentials (401/403)
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::ApiError { status: 401 | 403, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Transport failures and 5xx may succeed on a second attempt; 4xx never do
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(_) | Self::ConnectionFailed(_) => true,
            Self::ApiError { .. } => self.is_server_error(),
            Self::ParseError(_) | Self::InvalidRequest(_) => false,
        }
    }

    /// Classify this error for reporting
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RequestFailed(e) if e.is_decode() => ErrorKind::Parse,
            Self::RequestFailed(_) | Self::ConnectionFailed(_) => ErrorKind::Transport,
            Self::ApiError { .. } if self.is_auth_error() => ErrorKind::Auth,
            Self::ApiError { .. } => ErrorKind::Remote,
            Self::ParseError(_) => ErrorKind::Parse,
            Self::InvalidRequest(_) => ErrorKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let bad = ClientError::api_error(400, "already exists");
        assert!(bad.is_bad_request());
        assert!(bad.is_client_error());
        assert!(!bad.is_retryable());
        assert_eq!(bad.kind(), ErrorKind::Remote);

        let denied = ClientError::api_error(403, "forbidden");
        assert!(denied.is_auth_error());
        assert_eq!(denied.kind(), ErrorKind::Auth);
        assert!(!denied.is_retryable());

        let unavailable = ClientError::api_error(503, "maintenance");
        assert!(unavailable.is_server_error());
        assert!(unavailable.is_retryable());
        assert_eq!(unavailable.status(), Some(503));
    }

    #[test]
    fn test_transport_and_parse_kinds() {
        let down = ClientError::ConnectionFailed("connection refused".to_string());
        assert_eq!(down.kind(), ErrorKind::Transport);
        assert!(down.is_retryable());
        assert_eq!(down.status(), None);

        let garbled = ClientError::ParseError("expected value".to_string());
        assert_eq!(garbled.kind(), ErrorKind::Parse);
        assert!(!garbled.is_retryable());
    }
}
