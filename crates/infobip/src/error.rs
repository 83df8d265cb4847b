//! Error types for Infobip API operations.
//!
//! Errors carry enough of the remote response (status code and the
//! service's own error text) to be shown to the user verbatim, and are
//! categorized so callers can tell a missing template from a bad key.

use serde::Deserialize;
use std::fmt;

/// Result type alias for Infobip API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request never got a response.
    Network,
    /// The API key was rejected.
    Unauthorized,
    /// The addressed template does not exist.
    NotFound,
    /// The request was rejected as invalid.
    Client,
    /// The service failed to handle a valid request.
    Server,
    /// The response could not be decoded.
    Format,
    /// Invalid input detected before any request was made.
    Input,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Unauthorized => "Authentication failed",
            Self::NotFound => "Template not found",
            Self::Client => "Request rejected by the service",
            Self::Server => "Service error",
            Self::Format => "Unexpected response format",
            Self::Input => "Invalid input",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check the base URL and your network connection",
            Self::Unauthorized => "Check the API key and its scopes",
            Self::NotFound => "The template may have been deleted outside of this tool",
            Self::Client => "Check the template attributes against the service limits",
            Self::Server => "The service may be degraded, try again later",
            Self::Format => "The base URL may not point at the Infobip API",
            Self::Input => "Check the value passed in",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the Infobip API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error text reported by the service, or the raw body.
        message: String,
    },

    /// The request could not be sent or the response not received.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// A template id that is not an integer.
    #[error("invalid template id {0:?}: expected an integer")]
    InvalidId(String),

    /// A base URL that cannot be used to build requests.
    #[error("invalid base URL {0:?}")]
    InvalidBaseUrl(String),
}

impl Error {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Build an API error from a status code and a raw response body.
    ///
    /// Infobip wraps failures as
    /// `{"requestError": {"serviceException": {"messageId": .., "text": ..}}}`;
    /// the `text` is preferred when present.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = service_exception_text(body).unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {status}")
            } else {
                trimmed.to_string()
            }
        });
        Self::api(status, message)
    }

    /// HTTP status code, if the service answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the service reported that the addressed template does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Unauthorized,
                404 => ErrorCategory::NotFound,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            Self::Transport(_) => ErrorCategory::Network,
            Self::InvalidResponse(_) => ErrorCategory::Format,
            Self::InvalidId(_) | Self::InvalidBaseUrl(_) => ErrorCategory::Input,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::api(code, format!("HTTP {code}")),
            ureq::Error::Json(e) => Self::InvalidResponse(e.to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    request_error: RequestError,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestError {
    service_exception: ServiceException,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceException {
    message_id: Option<String>,
    text: Option<String>,
}

fn service_exception_text(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let exception = parsed.request_error.service_exception;
    match (exception.message_id, exception.text) {
        (Some(id), Some(text)) => Some(format!("{id}: {text}")),
        (None, Some(text)) => Some(text),
        (Some(id), None) => Some(id),
        (None, None) => None,
    }
}
