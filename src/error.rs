//! Error taxonomy for session and API operations.
//!
//! ERROR HANDLING
//! ==============
//! Every failure reaching a caller is one of these typed variants. Nothing
//! here panics; form controllers turn errors into a single toast.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::validate::FieldErrors;

/// Failures produced by the API client and session manager.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request never produced a response (DNS, connect, timeout, reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// Input failed local checks and was never sent.
    #[error("validation failed: {0}")]
    Validation(#[from] FieldErrors),

    /// The server responded with a non-2xx status. `from_server` is false
    /// when the body had no usable `message` and `message` is a generic one.
    #[error("{message}")]
    Api { status_code: u16, message: String, from_server: bool },

    /// A protected call was attempted without a stored credential.
    #[error("not authenticated")]
    Unauthenticated,

    /// A 2xx response carried a body that could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// HTTP status for server-side failures.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// The message the server put in its error body, if it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, from_server: true, .. } => Some(message),
            _ => None,
        }
    }

    /// True when the server rejected the credential, or none was available.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Api { status_code: 401, .. })
    }
}

/// Failures building configuration or the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}
