//! Tool Interception
//!
//! Wraps side-effecting tool callables so every invocation is evaluated by
//! a policy gateway before it runs. Denied calls never execute;
//! approval-gated calls suspend and resume once a human decides.
//!
//! # Example
//!
//! ```no_run
//! use gate_client::{GatewayConfig, HttpGateway, RiskLevel, ToolCallContext};
//! use gate_intercept::{tool_fn, InterceptedTool, ToolOutcome};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = Arc::new(HttpGateway::new(GatewayConfig::new(
//!         "https://gate.example.com", "api-key", "tenant-1", "app-1", "production",
//!     )));
//!
//!     let send_email = tool_fn(|args| async move {
//!         // ... deliver the email ...
//!         Ok(json!({"sent": true}))
//!     });
//!     let wrapped = InterceptedTool::new(gateway, "send_email", send_email);
//!
//!     let context = ToolCallContext::new("agent-1", "run-42")
//!         .with_risk_level(RiskLevel::High);
//!     let args = json!({"to": "cfo@example.com"}).as_object().unwrap().clone();
//!
//!     match wrapped.call(args, Some(&context)).await? {
//!         ToolOutcome::Executed(result) => println!("Ran immediately: {}", result),
//!         ToolOutcome::Pending(pending) => {
//!             // Hand `pending` to the orchestrator; it calls
//!             // `wrapped.resume(&pending.request_id, decision)` later.
//!             println!("Suspended as {}", pending.request_id);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod intercept;
pub mod tool;

// Re-exports
pub use error::{InterceptError, Result};
pub use intercept::{InterceptedTool, PendingToolCall, ToolOutcome};
pub use tool::{tool_fn, BoxError, ToolFn, ToolFuture};
