//! HTTP adapter error types.

use thiserror::Error;

use crate::application::ports::BackendError;

/// Errors from the HTTP backend adapter.
#[derive(Debug, Error, Clone)]
pub enum BackendHttpError {
    /// Client could not be built or the request could not be formed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the backend's `error` field, or the raw body.
        message: String,
    },

    /// Resource does not exist.
    #[error("Not found: {resource}")]
    NotFound {
        /// Request path or backend message.
        resource: String,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Suggested retry delay in seconds.
        retry_after_secs: u64,
    },

    /// Network error (retryable).
    #[error("Network error: {0}")]
    Network(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Max retries exceeded.
    #[error("Max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
    },
}

impl From<BackendHttpError> for BackendError {
    fn from(err: BackendHttpError) -> Self {
        match err {
            BackendHttpError::Network(message) => Self::Connection { message },
            BackendHttpError::MaxRetriesExceeded { attempts } => Self::Connection {
                message: format!("Max retries exceeded after {attempts} attempts"),
            },
            BackendHttpError::Api { status, message } => Self::Rejected { status, message },
            BackendHttpError::NotFound { resource } => Self::NotFound { resource },
            BackendHttpError::RateLimited { .. } => Self::RateLimited,
            BackendHttpError::JsonParse(message) => Self::MalformedResponse { message },
            BackendHttpError::Http(message) => Self::Unknown { message },
        }
    }
}
