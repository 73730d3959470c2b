//! Error types for the Chatwork client.
//!
//! # Design
//! Configuration problems (`NoApiKey`, `NoRoomSet`, `NoEndpoint`) are raised
//! before any request leaves the process, so callers can tell "nothing was
//! sent" apart from "the server said no". Every status >= 400 lands in
//! `RequestFailed` together with whatever the body's `errors` field held.

use thiserror::Error;

/// Errors returned by the executor, the typed client and the room wrapper.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client failed before a response arrived (DNS, connect, TLS).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with status >= 400.
    #[error("request failed with HTTP {status}: {}", .errors.join("; "))]
    RequestFailed { status: u16, errors: Vec<String> },

    /// No API key was configured.
    #[error("Chatwork Api Key has not been set.")]
    NoApiKey,

    /// A room action was invoked on a room without a `room_id`.
    #[error("Chatwork Room has not been set.")]
    NoRoomSet,

    /// The request was sent without an endpoint path.
    #[error("request endpoint has not been set")]
    NoEndpoint,

    /// Markup was requested for a message missing its id or author.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// A successful response body could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// HTTP status of a `RequestFailed`, `None` for every other variant.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_display_joins_errors() {
        let err = ApiError::RequestFailed {
            status: 401,
            errors: vec!["Invalid API token".to_string(), "try again".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "request failed with HTTP 401: Invalid API token; try again"
        );
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn configuration_errors_have_no_status() {
        assert_eq!(ApiError::NoApiKey.status(), None);
        assert_eq!(ApiError::NoRoomSet.to_string(), "Chatwork Room has not been set.");
    }
}
