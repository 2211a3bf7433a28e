//! Client error types with JSON-RPC 2.0 error codes.
//!
//! Dispatch-local failures (decode errors, unknown ids) are logged and
//! absorbed, never surfaced here; only send-path and wait-path failures are
//! caller-visible.

use crate::domain::config::ConfigError;
use crate::domain::correlation::CorrelationId;
use std::time::Duration;

/// Standard JSON-RPC 2.0 error codes
pub mod codes {
    // JSON-RPC 2.0 standard errors (-32700 to -32600)
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Server errors (-32000 to -32099)
    pub const SERVER_ERROR: i32 = -32000;
    pub const TIMEOUT: i32 = -32006;
}

/// Transport-level errors reported by the caller-supplied hooks
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Transport has been closed
    #[error("transport closed")]
    Closed,

    /// Outbound delivery failed
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Inbound receive failed
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Caller-visible errors from the client surface
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No matching response arrived within the deadline
    #[error("request timed out after {elapsed:?}")]
    Timeout {
        /// The deadline that elapsed
        elapsed: Duration,
    },

    /// Client has been closed
    #[error("client is closed")]
    Closed,

    /// A call with this correlation id is already pending
    #[error("correlation id already pending: {0}")]
    DuplicateCorrelationId(CorrelationId),

    /// Too many calls outstanding
    #[error("pending call limit exceeded ({0})")]
    PendingLimitExceeded(usize),

    /// Completion channel dropped before a response was delivered
    #[error("response channel closed before completion")]
    ChannelClosed,

    /// Transport hook failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Request encoding failure
    #[error("message encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// True for the timeout variant
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
