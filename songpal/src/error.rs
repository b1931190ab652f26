//! Songpal error types

use thiserror::Error;

/// Coarse classification of a [`SongpalError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Timeout, connection refused, DNS and other transport failures
    NetworkFailure,
    /// Non-200 status, JSON-RPC error member, malformed or missing fields
    ProtocolFailure,
    /// A setting value that could not be interpreted
    ValueParseFailure,
    /// Invalid local configuration, never caused by the device
    Configuration,
}

/// Songpal-specific error types
#[derive(Debug, Error)]
pub enum SongpalError {
    #[error("Request timeout after {duration_ms}ms during {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    #[error("Connection refused: {url} - {cause}")]
    ConnectionRefused {
        url: String,
        cause: String,
    },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("Device error {code}: {message}")]
    DeviceError { code: i32, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {target}: {value:?}")]
    InvalidValue { target: String, value: String },

    #[error("Operation not supported by device: {0}")]
    Unsupported(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SongpalError {
    /// Create a timeout error with operation context
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        SongpalError::Timeout {
            operation: operation.into(),
            duration_ms,
        }
    }

    /// Create a connection refused error
    pub fn connection_refused(url: impl Into<String>, cause: impl Into<String>) -> Self {
        SongpalError::ConnectionRefused {
            url: url.into(),
            cause: cause.into(),
        }
    }

    pub fn invalid_value(target: impl Into<String>, value: impl Into<String>) -> Self {
        SongpalError::InvalidValue {
            target: target.into(),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SongpalError::Timeout { .. }
            | SongpalError::ConnectionRefused { .. }
            | SongpalError::RequestFailed(_) => ErrorKind::NetworkFailure,
            SongpalError::HttpError { .. }
            | SongpalError::DeviceError { .. }
            | SongpalError::ParseError(_)
            | SongpalError::Unsupported(_) => ErrorKind::ProtocolFailure,
            SongpalError::InvalidValue { .. } => ErrorKind::ValueParseFailure,
            SongpalError::InvalidConfig(_) => ErrorKind::Configuration,
        }
    }

    /// True when the device could not be reached at all
    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::NetworkFailure
    }
}

impl From<reqwest::Error> for SongpalError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        if err.is_timeout() {
            // DeviceClient::call replaces this with the configured timeout
            SongpalError::Timeout {
                operation: url,
                duration_ms: 0,
            }
        } else if err.is_connect() {
            SongpalError::ConnectionRefused {
                url,
                cause: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            SongpalError::HttpError {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            SongpalError::ParseError(err.to_string())
        } else {
            SongpalError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SongpalError {
    fn from(err: serde_json::Error) -> Self {
        SongpalError::ParseError(err.to_string())
    }
}

pub type SongpalResult<T> = Result<T, SongpalError>;
