//! Base error type for the toolgate SDK

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, GateError>;

/// Errors shared across the toolgate crates
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Configuration errors (missing or invalid options)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl GateError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = GateError::config("missing api_key");
        assert!(matches!(err, GateError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: missing api_key");
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = GateError::from(serde_err);
        assert!(matches!(err, GateError::Serialization(_)));
    }
}
