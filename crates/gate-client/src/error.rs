//! Error types for gateway operations

use gate_core::GateError;
use std::time::Duration;

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors from the policy gateway client
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Network/connection-level failure, potentially retryable
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed or unexpected gateway response, not retryable
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The gateway does not know this request id
    #[error("Request not found: {0}")]
    NotFound(String),

    /// A revision was submitted against a stale version
    #[error("Version conflict: request is now at version {current_version}")]
    VersionConflict { current_version: u64 },

    /// The wait deadline elapsed without a decision
    #[error("No decision for request {request_id} within {elapsed:?}")]
    DecisionTimeout {
        request_id: String,
        elapsed: Duration,
    },

    /// The wait was cancelled by the caller
    #[error("Wait for request {request_id} was cancelled")]
    WaitCancelled { request_id: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error from gate-core
    #[error(transparent)]
    Core(#[from] GateError),
}

impl GatewayError {
    /// Create a transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a protocol error
    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        Self::Protocol(msg.into())
    }

    /// Whether a retry at the same interval may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = GatewayError::transport("connection refused");
        assert!(matches!(err, GatewayError::Transport(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn test_only_transport_is_transient() {
        assert!(!GatewayError::protocol("bad body").is_transient());
        assert!(!GatewayError::NotFound("req-1".to_string()).is_transient());
        assert!(!GatewayError::VersionConflict { current_version: 3 }.is_transient());
    }
}
