//! Error types for shepherd-remote.

use thiserror::Error;

/// All errors that can arise from talking to the repository host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// No credential configured, or the host rejected it. Always fatal.
    #[error("authentication failed: {reason}")]
    Auth { reason: String },

    /// The host answered with a non-success status other than "not found".
    #[error("remote API error {status} for {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The response body did not have the expected shape or encoding.
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl RemoteError {
    pub fn is_auth(&self) -> bool {
        matches!(self, RemoteError::Auth { .. })
    }
}
