//! Error types for the character API client.
//!
//! # Design
//! `ErrorKind` is the closed set of outcomes a service call can fail with.
//! The variants carry no payload; decode and transport details are logged
//! where they occur and do not escape the client. `TransportError` is the
//! gateway's own failure type and is always folded into
//! `ErrorKind::Timeout` before it reaches a caller.

use thiserror::Error;

/// Failure categories reported by `CharacterService` and `SettingsService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    /// No HTTP response was obtained (connection error, timeout, dropped
    /// request). Covers every non-HTTP failure, not only timeouts.
    #[error("request did not complete")]
    Timeout,

    /// A response body was present but did not match the expected schema.
    /// An empty body lands here as well.
    #[error("response body is not a valid payload")]
    InvalidPayload,

    /// The upstream reported status 500.
    #[error("upstream server error")]
    ServerError,

    /// The upstream reported status 201, which this API uses for
    /// "resource not found".
    #[error("resource not found")]
    NotFound,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::Timeout,
        ErrorKind::InvalidPayload,
        ErrorKind::ServerError,
        ErrorKind::NotFound,
    ];
}

/// Failures raised by a `Gateway` before any HTTP status is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be sent or no response arrived in time.
    #[error("connection failed: {0}")]
    Connect(String),

    /// A response started but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The gateway dropped the completion without reporting an outcome.
    #[error("request was dropped before completing")]
    Dropped,
}

impl From<TransportError> for ErrorKind {
    fn from(_: TransportError) -> Self {
        ErrorKind::Timeout
    }
}
