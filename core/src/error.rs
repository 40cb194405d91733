//! Error types for the MainPay client.
//!
//! # Design
//! A 4xx response that carries a body is not an error: the decoded body is
//! handed back to the caller like any success payload. Everything that leaves
//! the caller without a usable JSON document gets its own variant, so a
//! remote refusal, a dead network and a garbled body stay distinguishable.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, MainPayError>;

/// Errors returned by `MainPay` and its transports.
#[derive(Debug, Error)]
pub enum MainPayError {
    /// The client configuration was rejected at construction or by a setter.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The request could not be built (for example a path without a leading `/`).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The server answered with a status that carries no usable body: a 4xx
    /// with an empty body, or any 3xx/5xx.
    #[error("HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// No response was received, or the connection failed while reading it.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response body is not valid UTF-8 JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("request body could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl MainPayError {
    pub fn is_transport(&self) -> bool {
        matches!(self, MainPayError::Transport(_))
    }

    /// HTTP status of a `Remote` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            MainPayError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ureq::Error> for MainPayError {
    fn from(err: ureq::Error) -> Self {
        MainPayError::Transport(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_exposes_status() {
        let err = MainPayError::Remote {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }

    #[test]
    fn transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = MainPayError::Transport(Box::new(io));
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
        assert!(std::error::Error::source(&err).is_some());
    }
}
