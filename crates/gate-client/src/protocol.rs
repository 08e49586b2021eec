//! Wire protocol types for the policy gateway
//!
//! Three exchanges: submit a tool call for evaluation, poll a pending
//! request for its decision, and revise a still-pending proposal. The raw
//! response shapes live here alongside the conversions into the public
//! model, so protocol parsing is testable without a network.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::{RiskLevel, ToolCallContext};
use crate::error::{GatewayError, Result};
use gate_redact::{redact_with, RedactionPolicy};

/// The gateway's immediate verdict on a submitted tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationAction {
    /// Execute immediately
    Allow,
    /// Never execute
    Deny,
    /// Suspend until a human decides
    RequireApproval,
}

/// Response to a submitted tool call
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvaluationResult {
    /// Opaque identifier, unique per submitted request
    pub request_id: String,
    /// The policy verdict
    pub action: EvaluationAction,
    /// Optional human-readable explanation
    #[serde(default)]
    pub reason: Option<String>,
    /// When a pending request stops accepting decisions
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A proposed tool invocation
///
/// Built fresh per invocation; never mutated after submission except via a
/// [`ProposalRevision`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub tool_name: String,
    pub tool_args: Map<String, Value>,
    pub context: ToolCallContext,
    pub tool_args_redacted: Map<String, Value>,
}

impl ToolCallRequest {
    /// Build a request, redacting the arguments with the given policy
    pub fn new(
        tool_name: &str,
        tool_args: Map<String, Value>,
        context: ToolCallContext,
        policy: &RedactionPolicy,
    ) -> Self {
        let redacted = redact_with(&tool_args, policy);
        Self {
            tool_name: tool_name.to_string(),
            tool_args,
            context,
            tool_args_redacted: redacted.args,
        }
    }
}

/// Submission payload — only the redacted view of the arguments leaves the
/// process
#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequest<'a> {
    pub tool_name: &'a str,
    pub tool_args: &'a Map<String, Value>,
    pub context: &'a ToolCallContext,
}

/// Terminal resolution of a pending approval request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "UPPERCASE")]
pub enum Decision {
    /// Execute, optionally with edits made during approval
    Approved {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        revised_request: Option<Box<ToolCallRequest>>,
    },
    /// Do not execute
    Rejected {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    /// The request expired before anyone decided
    Expired,
    /// The request was cancelled
    Cancelled,
}

/// One poll of a pending request
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Still open; poll again later
    Pending,
    /// Terminal decision observed
    Resolved(Decision),
}

/// Raw poll response body
#[derive(Debug, Deserialize)]
pub(crate) struct PollResponse {
    status: String,
    #[serde(default)]
    decision: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    revised_request: Option<Box<ToolCallRequest>>,
}

impl PollResponse {
    pub(crate) fn into_outcome(self) -> Result<PollOutcome> {
        match self.status.as_str() {
            "pending" => Ok(PollOutcome::Pending),
            "resolved" => {
                let decision = match self.decision.as_deref() {
                    Some("APPROVED") => Decision::Approved {
                        revised_request: self.revised_request,
                    },
                    Some("REJECTED") => Decision::Rejected { note: self.note },
                    Some("EXPIRED") => Decision::Expired,
                    Some("CANCELLED") => Decision::Cancelled,
                    Some(other) => {
                        return Err(GatewayError::protocol(format!(
                            "unrecognized decision value: {}",
                            other
                        )))
                    }
                    None => {
                        return Err(GatewayError::protocol(
                            "resolved response is missing a decision",
                        ))
                    }
                };
                Ok(PollOutcome::Resolved(decision))
            }
            other => Err(GatewayError::protocol(format!(
                "unrecognized poll status: {}",
                other
            ))),
        }
    }
}

/// Caller-issued amendment to a still-pending request
///
/// Accepted by the gateway only when the request's current version equals
/// `version_from` (optimistic concurrency).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRevision {
    pub version_from: u64,
    pub updated_tool_name: String,
    pub updated_tool_args: Map<String, Value>,
    pub updated_tool_args_redacted: Map<String, Value>,
    pub updated_context_summary: String,
    pub updated_risk_level: RiskLevel,
    pub tags: Vec<String>,
}

impl ProposalRevision {
    /// Build a revision from replacement arguments, redacting them with the
    /// given policy and carrying over summary/risk/tags from the context
    pub fn new(
        version_from: u64,
        updated_tool_name: &str,
        updated_tool_args: Map<String, Value>,
        context: &ToolCallContext,
        policy: &RedactionPolicy,
    ) -> Self {
        let redacted = redact_with(&updated_tool_args, policy);
        Self {
            version_from,
            updated_tool_name: updated_tool_name.to_string(),
            updated_tool_args,
            updated_tool_args_redacted: redacted.args,
            updated_context_summary: context.context_summary.clone(),
            updated_risk_level: context.risk_level,
            tags: context.tags.clone(),
        }
    }
}

/// Acknowledgement of an accepted revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionAccepted {
    /// The request's new current version
    pub version: u64,
}

/// Raw revision response body
#[derive(Debug, Deserialize)]
pub(crate) struct RevisionResponse {
    status: String,
    #[serde(default)]
    version: Option<u64>,
    #[serde(default)]
    current_version: Option<u64>,
}

impl RevisionResponse {
    pub(crate) fn into_outcome(self, version_from: u64) -> Result<RevisionAccepted> {
        match self.status.as_str() {
            "accepted" => Ok(RevisionAccepted {
                version: self.version.unwrap_or(version_from + 1),
            }),
            "conflict" => Err(GatewayError::VersionConflict {
                current_version: self.current_version.unwrap_or(version_from),
            }),
            other => Err(GatewayError::protocol(format!(
                "unrecognized revision status: {}",
                other
            ))),
        }
    }
}
