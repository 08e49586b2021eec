//! Policy Gateway Client
//!
//! Submits proposed tool calls to a remote policy gateway, polls for human
//! decisions, and amends still-pending proposals. Arguments are redacted
//! before they leave the process.
//!
//! # Example
//!
//! ```no_run
//! use gate_client::{run_approval_loop, GatewayConfig, HttpGateway, RiskLevel, ToolCallContext};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = HttpGateway::new(GatewayConfig::new(
//!         "https://gate.example.com",
//!         "api-key",
//!         "tenant-1",
//!         "app-1",
//!         "production",
//!     ));
//!
//!     let context = ToolCallContext::new("agent-1", "run-42")
//!         .with_risk_level(RiskLevel::High)
//!         .with_summary("Email the quarterly report");
//!
//!     let args = json!({"to": "cfo@example.com"}).as_object().unwrap().clone();
//!     let outcome = run_approval_loop(&gateway, "send_email", args, &context, None).await?;
//!     println!("Outcome: {:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod approval_loop;
pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod http;
pub mod protocol;
pub mod wait;

// Test support
pub mod mock;

// Re-exports
pub use approval_loop::{revise_pending, run_approval_loop, ApprovalOutcome};
pub use config::GatewayConfig;
pub use context::{DisplayHints, RiskLevel, ToolCallContext};
pub use error::{GatewayError, Result};
pub use gateway::PolicyGateway;
pub use http::HttpGateway;
pub use protocol::{
    Decision, EvaluationAction, EvaluationResult, PollOutcome, ProposalRevision,
    RevisionAccepted, ToolCallRequest,
};
pub use wait::{wait_for_decision, WaitOptions};

// The redaction engine is part of this crate's public contract
pub use gate_redact::{RedactionPolicy, REDACTED_SENTINEL};
