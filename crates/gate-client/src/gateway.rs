//! Policy gateway capability trait

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::context::ToolCallContext;
use crate::error::Result;
use crate::protocol::{EvaluationResult, PollOutcome, ProposalRevision, RevisionAccepted};

/// A policy authority that decides whether tool calls may run
///
/// Implementations handle HOW the decision is obtained; callers program
/// against this interface. [`HttpGateway`](crate::HttpGateway) talks to a
/// remote gateway over HTTP; [`MockGateway`](crate::mock::MockGateway)
/// scripts decisions for tests. Anything implementing `before_execute` is a
/// valid interceptor.
#[async_trait]
pub trait PolicyGateway: Send + Sync {
    /// Submit a tool call for evaluation
    ///
    /// Redacts `tool_args` before submission and performs exactly one
    /// outbound request. Retry policy belongs to the caller or the wait
    /// loop, never to this method.
    async fn before_execute(
        &self,
        tool_name: &str,
        tool_args: &Map<String, Value>,
        context: &ToolCallContext,
    ) -> Result<EvaluationResult>;

    /// Query a pending request once
    ///
    /// Returns [`PollOutcome::Pending`] while the request is still open,
    /// otherwise the terminal decision.
    async fn poll_decision(&self, request_id: &str) -> Result<PollOutcome>;

    /// Amend a still-pending request
    ///
    /// Fails with `VersionConflict` when another party updated the request
    /// first; the caller must re-fetch and recompute the revision.
    async fn submit_revision(
        &self,
        request_id: &str,
        revision: ProposalRevision,
    ) -> Result<RevisionAccepted>;

    /// Get the gateway name (for logging/debugging)
    fn name(&self) -> &str;
}
