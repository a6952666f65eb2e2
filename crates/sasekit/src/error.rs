//! Error types for API client operations.
//!
//! Errors are categorized so callers can give appropriate feedback. Nothing in
//! this crate retries: a failed call is reported once and the caller decides.

use std::fmt;

/// Result type alias for API client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Token acquisition or credential problems.
    Authentication,
    /// Network or transport failure.
    Network,
    /// The remote API answered with an unexpected status.
    Remote,
    /// Response body could not be decoded.
    Format,
    /// Local configuration is incomplete or invalid.
    Config,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Authentication => "Authentication failed",
            Self::Network => "Network connectivity issue",
            Self::Remote => "Unexpected API response",
            Self::Format => "Invalid response format",
            Self::Config => "Invalid client configuration",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Authentication => {
                "Check the client id, client secret and TSG id of the service account"
            }
            Self::Network => "Check your internet connection and the API base URL",
            Self::Remote => "Inspect the response body for the API's own error message",
            Self::Format => "The API may have changed; check the response body",
            Self::Config => "Fix the provider settings and try again",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the configuration API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Could not obtain an access token.
    #[error("authentication failed: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// HTTP transport failed before a response was received.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// A read call returned a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Invalid response from API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// Client configuration problem.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an HTTP transport error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Authentication { .. } => ErrorCategory::Authentication,
            Error::Http { .. } => ErrorCategory::Network,
            Error::Status { status, .. } if *status == 401 || *status == 403 => {
                ErrorCategory::Authentication
            }
            Error::Status { .. } => ErrorCategory::Remote,
            Error::InvalidResponse(_) => ErrorCategory::Format,
            Error::Config(_) => ErrorCategory::Config,
        }
    }

    /// Whether the error stems from credentials rather than transport.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        self.category() == ErrorCategory::Authentication
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
