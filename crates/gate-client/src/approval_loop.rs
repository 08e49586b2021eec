//! High-level approval lifecycle driver
//!
//! Composes submission, the decision wait loop, and decision mapping for
//! polling-mode callers that have no external orchestrator to park a
//! pending call with.

use serde_json::{Map, Value};

use crate::context::ToolCallContext;
use crate::error::Result;
use crate::gateway::PolicyGateway;
use crate::protocol::{Decision, EvaluationAction, ProposalRevision, RevisionAccepted};
use crate::wait::{wait_for_decision, WaitOptions};
use gate_redact::RedactionPolicy;

/// Outcome of a full approval lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    /// Policy allowed immediately; execute with these arguments
    Allowed { tool_args: Map<String, Value> },
    /// Policy denied immediately; never execute
    Denied { reason: Option<String> },
    /// A human approved; execute with these (possibly revised) arguments
    Approved {
        request_id: String,
        tool_args: Map<String, Value>,
    },
    /// A human rejected; never execute
    Rejected {
        request_id: String,
        note: Option<String>,
    },
    /// The request expired undecided; never execute
    Expired { request_id: String },
    /// The request was cancelled; never execute
    Cancelled { request_id: String },
}

impl ApprovalOutcome {
    /// Arguments to execute with, when execution is permitted
    pub fn executable_args(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Allowed { tool_args } | Self::Approved { tool_args, .. } => Some(tool_args),
            _ => None,
        }
    }
}

/// Run the full approval lifecycle for one tool call
///
/// Submits the call; returns immediately on ALLOW/DENY; on
/// REQUIRE_APPROVAL drives [`wait_for_decision`] (deriving the timeout from
/// the gateway expiry when `options` is `None`) and maps the terminal
/// decision. When an approval carries a revision, the revised arguments are
/// returned in place of the originals.
pub async fn run_approval_loop<G: PolicyGateway + ?Sized>(
    gateway: &G,
    tool_name: &str,
    tool_args: Map<String, Value>,
    context: &ToolCallContext,
    options: Option<WaitOptions>,
) -> Result<ApprovalOutcome> {
    let evaluation = gateway
        .before_execute(tool_name, &tool_args, context)
        .await?;

    match evaluation.action {
        EvaluationAction::Allow => Ok(ApprovalOutcome::Allowed { tool_args }),
        EvaluationAction::Deny => Ok(ApprovalOutcome::Denied {
            reason: evaluation.reason,
        }),
        EvaluationAction::RequireApproval => {
            let request_id = evaluation.request_id;
            let options = options.unwrap_or_else(|| WaitOptions::until(evaluation.expires_at));

            let decision = wait_for_decision(gateway, &request_id, &options).await?;
            Ok(match decision {
                Decision::Approved { revised_request } => ApprovalOutcome::Approved {
                    request_id,
                    tool_args: revised_request
                        .map(|revised| revised.tool_args)
                        .unwrap_or(tool_args),
                },
                Decision::Rejected { note } => ApprovalOutcome::Rejected { request_id, note },
                Decision::Expired => ApprovalOutcome::Expired { request_id },
                Decision::Cancelled => ApprovalOutcome::Cancelled { request_id },
            })
        }
    }
}

/// Amend a still-pending request with replacement arguments
///
/// Re-redacts the updated arguments and submits a [`ProposalRevision`].
/// A `VersionConflict` error means another party updated the request first;
/// re-fetch and recompute the revision before retrying.
pub async fn revise_pending<G: PolicyGateway + ?Sized>(
    gateway: &G,
    request_id: &str,
    version_from: u64,
    updated_tool_name: &str,
    updated_tool_args: Map<String, Value>,
    context: &ToolCallContext,
    policy: &RedactionPolicy,
) -> Result<RevisionAccepted> {
    let revision = ProposalRevision::new(
        version_from,
        updated_tool_name,
        updated_tool_args,
        context,
        policy,
    );
    gateway.submit_revision(request_id, revision).await
}
