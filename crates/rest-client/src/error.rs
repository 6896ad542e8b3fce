//! Transport error types.

use auth::AuthError;
use thiserror::Error;

/// Errors that can terminate an API call.
///
/// Individual retryable failures (server errors, connection problems) are
/// swallowed and logged inside the retry loop; only exhaustion surfaces.
/// 4xx responses are not errors at this layer and come back as ordinary
/// responses.
#[derive(Debug, Error)]
pub enum RestError {
    /// The target URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Every attempt failed or returned a retryable status.
    #[error("Max retries exceeded to {endpoint}")]
    RetriesExhausted {
        /// The endpoint URL, without auth material.
        endpoint: String,
    },

    /// Network-level failure surfaced from the underlying stack.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Failed to build the HTTP client or request.
    #[error("Request build error: {0}")]
    RequestBuild(String),

    /// Authentication error unrelated to the URL.
    #[error("Authentication error: {0}")]
    Auth(#[source] AuthError),
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidUrl(url) => RestError::InvalidUrl(url),
            other => RestError::Auth(other),
        }
    }
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            RestError::RequestBuild(err.to_string())
        } else {
            RestError::Transport(err.to_string())
        }
    }
}
