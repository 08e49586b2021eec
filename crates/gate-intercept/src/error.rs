//! Error types for tool interception

use gate_client::GatewayError;

/// Result type for interception operations
pub type Result<T> = std::result::Result<T, InterceptError>;

/// Errors raised at the tool execution boundary
#[derive(Debug, thiserror::Error)]
pub enum InterceptError {
    /// Interception requires a context; absence is a caller error, never a
    /// silent allow
    #[error("Tool call context is required for interception")]
    MissingContext,

    /// The gateway or a human denied the call
    #[error("Tool call denied: {}", reason.as_deref().unwrap_or("no reason given"))]
    Denied { reason: Option<String> },

    /// The approval request expired before anyone decided
    #[error("Approval request {request_id} expired before a decision")]
    Expired { request_id: String },

    /// The approval request was cancelled
    #[error("Tool call cancelled for request {request_id}")]
    Cancelled { request_id: String },

    /// Resume was called with a request id that is not pending here
    #[error("No pending tool call for request {0}")]
    UnknownRequest(String),

    /// The underlying tool failed; surfaced unchanged, never swallowed
    #[error("Tool execution failed: {0}")]
    Tool(String),

    /// Error from the gateway client
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
