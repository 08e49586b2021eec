//! Argument Redaction
//!
//! Sanitizes tool arguments before they leave the agent's process. Values
//! are replaced with a fixed sentinel when their key matches a deny-list of
//! sensitive name fragments, or when the value itself looks like a
//! machine-generated secret.
//!
//! Redaction is pure and total: it never fails, never changes the key set
//! or shape of its input, and is idempotent.
//!
//! # Example
//!
//! ```
//! use gate_redact::redact;
//! use serde_json::{json, Map};
//!
//! let args: Map<String, serde_json::Value> = json!({
//!     "to": "a@b.com",
//!     "api_key": "sk-abc123xyz",
//! }).as_object().unwrap().clone();
//!
//! let redacted = redact(&args);
//! assert_eq!(redacted.args["api_key"], "[REDACTED]");
//! assert_eq!(redacted.args["to"], "a@b.com");
//! assert_eq!(redacted.redacted_keys, vec!["api_key"]);
//! ```

pub mod engine;
pub mod policy;

// Re-exports
pub use engine::{redact, redact_with, Redacted, REDACTED_SENTINEL};
pub use policy::RedactionPolicy;
