//! The tool interception adapter
//!
//! Wraps a callable so every invocation is routed through the policy
//! gateway first. ALLOW runs the tool immediately; DENY fails without
//! running it; REQUIRE_APPROVAL suspends — the call is parked in a pending
//! map and a [`PendingToolCall`] is handed to the surrounding orchestration,
//! which later resumes it with the resolved decision.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{InterceptError, Result};
use crate::tool::ToolFn;
use gate_client::{
    wait_for_decision, Decision, EvaluationAction, PolicyGateway, ToolCallContext, WaitOptions,
};

/// Suspension signal for the orchestration layer
///
/// Carries enough state to persist the paused invocation and resume it once
/// a decision lands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingToolCall {
    /// Gateway request identifier
    pub request_id: String,
    /// The intercepted tool
    pub tool_name: String,
    /// Original, unredacted arguments to execute with on plain approval
    pub original_args: Map<String, Value>,
    /// When the gateway stops accepting decisions
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of one intercepted invocation
#[derive(Debug)]
pub enum ToolOutcome {
    /// The tool ran; its result is returned unchanged
    Executed(Value),
    /// The call is suspended awaiting a human decision
    Pending(PendingToolCall),
}

/// A callable wrapped with policy interception
///
/// Clone-cheap: clones share the gateway and the pending-call map, so a
/// web handler can resume calls parked by a worker task.
pub struct InterceptedTool<G> {
    gateway: Arc<G>,
    tool_name: String,
    tool: ToolFn,
    pending: Arc<DashMap<String, PendingToolCall>>,
}

impl<G> Clone for InterceptedTool<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            tool_name: self.tool_name.clone(),
            tool: Arc::clone(&self.tool),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<G: PolicyGateway> InterceptedTool<G> {
    /// Wrap a tool callable with the given gateway
    pub fn new<S: Into<String>>(gateway: Arc<G>, tool_name: S, tool: ToolFn) -> Self {
        Self {
            gateway,
            tool_name: tool_name.into(),
            tool,
            pending: Arc::new(DashMap::new()),
        }
    }

    /// The wrapped tool's name
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Number of calls currently suspended
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Invoke the tool through the policy gateway
    ///
    /// Context is required for interception to occur at all; its absence is
    /// a caller error, never a silent allow.
    pub async fn call(
        &self,
        args: Map<String, Value>,
        context: Option<&ToolCallContext>,
    ) -> Result<ToolOutcome> {
        let context = context.ok_or(InterceptError::MissingContext)?;

        let evaluation = self
            .gateway
            .before_execute(&self.tool_name, &args, context)
            .await?;

        match evaluation.action {
            EvaluationAction::Allow => {
                tracing::info!(tool_name = %self.tool_name, "Policy allowed tool call");
                Ok(ToolOutcome::Executed(self.run_tool(args).await?))
            }
            EvaluationAction::Deny => {
                tracing::warn!(
                    tool_name = %self.tool_name,
                    reason = ?evaluation.reason,
                    "Policy denied tool call"
                );
                Err(InterceptError::Denied {
                    reason: evaluation.reason,
                })
            }
            EvaluationAction::RequireApproval => {
                let pending = PendingToolCall {
                    request_id: evaluation.request_id.clone(),
                    tool_name: self.tool_name.clone(),
                    original_args: args,
                    expires_at: evaluation.expires_at,
                };
                self.pending
                    .insert(evaluation.request_id.clone(), pending.clone());

                tracing::info!(
                    tool_name = %self.tool_name,
                    request_id = %evaluation.request_id,
                    "Tool call suspended pending approval"
                );
                Ok(ToolOutcome::Pending(pending))
            }
        }
    }

    /// Resume a suspended call with its resolved decision
    ///
    /// On approval the tool runs with the revised arguments when the
    /// decision carried a revision, the original arguments otherwise. Every
    /// other decision fails without running the tool.
    pub async fn resume(&self, request_id: &str, decision: Decision) -> Result<Value> {
        let (_, pending) = self
            .pending
            .remove(request_id)
            .ok_or_else(|| InterceptError::UnknownRequest(request_id.to_string()))?;

        match decision {
            Decision::Approved { revised_request } => {
                let args = match revised_request {
                    Some(revised) => {
                        tracing::info!(request_id, "Resuming with revised arguments");
                        revised.tool_args
                    }
                    None => pending.original_args,
                };
                self.run_tool(args).await
            }
            Decision::Rejected { note } => {
                tracing::warn!(request_id, note = ?note, "Tool call rejected by human");
                Err(InterceptError::Denied { reason: note })
            }
            Decision::Expired => Err(InterceptError::Expired {
                request_id: request_id.to_string(),
            }),
            Decision::Cancelled => Err(InterceptError::Cancelled {
                request_id: request_id.to_string(),
            }),
        }
    }

    /// Invoke the tool, waiting inline for any required approval
    ///
    /// For callers without an external orchestrator: composes [`call`],
    /// the decision wait loop, and [`resume`]. When `options` is `None` the
    /// wait deadline is derived from the gateway expiry. A failed wait
    /// (timeout, cancellation, gateway error) drops the suspended entry;
    /// the call must be resubmitted, not resumed.
    ///
    /// [`call`]: InterceptedTool::call
    /// [`resume`]: InterceptedTool::resume
    pub async fn call_and_wait(
        &self,
        args: Map<String, Value>,
        context: Option<&ToolCallContext>,
        options: Option<WaitOptions>,
    ) -> Result<Value> {
        match self.call(args, context).await? {
            ToolOutcome::Executed(value) => Ok(value),
            ToolOutcome::Pending(pending) => {
                let options = options.unwrap_or_else(|| WaitOptions::until(pending.expires_at));
                let decision =
                    match wait_for_decision(self.gateway.as_ref(), &pending.request_id, &options)
                        .await
                    {
                        Ok(decision) => decision,
                        Err(e) => {
                            self.pending.remove(&pending.request_id);
                            return Err(e.into());
                        }
                    };
                self.resume(&pending.request_id, decision).await
            }
        }
    }

    async fn run_tool(&self, args: Map<String, Value>) -> Result<Value> {
        (self.tool)(args)
            .await
            .map_err(|e| InterceptError::Tool(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{tool_fn, BoxError};
    use gate_client::mock::MockGateway;
    use gate_client::{GatewayError, ToolCallRequest};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().expect("test value is an object").clone()
    }

    fn ctx() -> ToolCallContext {
        ToolCallContext::new("agent-1", "run-1")
    }

    /// Tool that records every argument object it is invoked with
    fn recording_tool() -> (ToolFn, Arc<Mutex<Vec<Map<String, Value>>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let tool = tool_fn(move |args| {
            let recorded = Arc::clone(&recorded);
            async move {
                recorded.lock().expect("calls lock").push(args);
                Ok(json!({"sent": true}))
            }
        });
        (tool, calls)
    }

    #[tokio::test]
    async fn test_allow_invokes_once_with_original_args() {
        let (tool, calls) = recording_tool();
        let wrapped = InterceptedTool::new(Arc::new(MockGateway::allow()), "send_email", tool);

        let outcome = wrapped
            .call(args(json!({"to": "a@b.com", "api_key": "sk-abc123xyz"})), Some(&ctx()))
            .await
            .unwrap();

        assert!(matches!(outcome, ToolOutcome::Executed(_)));
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        // The tool sees the original, unredacted arguments
        assert_eq!(calls[0]["api_key"], "sk-abc123xyz");
    }

    #[tokio::test]
    async fn test_deny_never_invokes_tool() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invocations);
        let tool = tool_fn(move |_args| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(json!(null)) }
        });
        let wrapped = InterceptedTool::new(
            Arc::new(MockGateway::deny("external recipient")),
            "send_email",
            tool,
        );

        let result = wrapped.call(Map::new(), Some(&ctx())).await;
        match result {
            Err(InterceptError::Denied { reason }) => {
                assert_eq!(reason.as_deref(), Some("external recipient"))
            }
            other => panic!("Expected denied, got {:?}", other),
        }
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_context_fails_before_gateway() {
        let (tool, calls) = recording_tool();
        let gateway = Arc::new(MockGateway::allow());
        let wrapped = InterceptedTool::new(Arc::clone(&gateway), "send_email", tool);

        let result = wrapped.call(Map::new(), None).await;
        assert!(matches!(result, Err(InterceptError::MissingContext)));
        assert_eq!(gateway.submit_count(), 0);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_require_approval_suspends() {
        let (tool, calls) = recording_tool();
        let wrapped = InterceptedTool::new(
            Arc::new(MockGateway::require_approval("req-1")),
            "send_email",
            tool,
        );

        let outcome = wrapped
            .call(args(json!({"to": "a@b.com"})), Some(&ctx()))
            .await
            .unwrap();

        match outcome {
            ToolOutcome::Pending(pending) => {
                assert_eq!(pending.request_id, "req-1");
                assert_eq!(pending.tool_name, "send_email");
                assert_eq!(pending.original_args["to"], "a@b.com");
            }
            other => panic!("Expected pending, got {:?}", other),
        }
        assert_eq!(wrapped.pending_count(), 1);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resume_approved_uses_original_args() {
        let (tool, calls) = recording_tool();
        let wrapped = InterceptedTool::new(
            Arc::new(MockGateway::require_approval("req-1")),
            "send_email",
            tool,
        );

        wrapped
            .call(args(json!({"to": "a@b.com"})), Some(&ctx()))
            .await
            .unwrap();
        let result = wrapped
            .resume("req-1", Decision::Approved { revised_request: None })
            .await
            .unwrap();

        assert_eq!(result["sent"], true);
        assert_eq!(calls.lock().unwrap()[0]["to"], "a@b.com");
        assert_eq!(wrapped.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_resume_approved_with_revision_uses_revised_args() {
        let (tool, calls) = recording_tool();
        let wrapped = InterceptedTool::new(
            Arc::new(MockGateway::require_approval("req-1")),
            "send_email",
            tool,
        );

        wrapped
            .call(args(json!({"to": "a@b.com"})), Some(&ctx()))
            .await
            .unwrap();

        let revised = ToolCallRequest::new(
            "send_email",
            args(json!({"to": "c@d.com"})),
            ctx(),
            &gate_client::RedactionPolicy::default(),
        );
        wrapped
            .resume(
                "req-1",
                Decision::Approved {
                    revised_request: Some(Box::new(revised)),
                },
            )
            .await
            .unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["to"], "c@d.com");
    }

    #[tokio::test]
    async fn test_resume_rejected_never_runs_tool() {
        let (tool, calls) = recording_tool();
        let wrapped = InterceptedTool::new(
            Arc::new(MockGateway::require_approval("req-1")),
            "send_email",
            tool,
        );

        wrapped.call(Map::new(), Some(&ctx())).await.unwrap();
        let result = wrapped
            .resume(
                "req-1",
                Decision::Rejected {
                    note: Some("not appropriate".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(InterceptError::Denied { .. })));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resume_expired_and_cancelled() {
        for (decision, is_expired) in [(Decision::Expired, true), (Decision::Cancelled, false)] {
            let (tool, calls) = recording_tool();
            let wrapped = InterceptedTool::new(
                Arc::new(MockGateway::require_approval("req-1")),
                "send_email",
                tool,
            );

            wrapped.call(Map::new(), Some(&ctx())).await.unwrap();
            let result = wrapped.resume("req-1", decision).await;

            if is_expired {
                assert!(matches!(result, Err(InterceptError::Expired { .. })));
            } else {
                assert!(matches!(result, Err(InterceptError::Cancelled { .. })));
            }
            assert!(calls.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_failed_wait_clears_pending_entry() {
        let (tool, calls) = recording_tool();
        let wrapped = InterceptedTool::new(
            Arc::new(MockGateway::require_approval("req-1")),
            "send_email",
            tool,
        );

        let options = WaitOptions::new(Duration::from_millis(50), Duration::from_millis(20));
        let result = wrapped
            .call_and_wait(Map::new(), Some(&ctx()), Some(options))
            .await;

        assert!(matches!(
            result,
            Err(InterceptError::Gateway(GatewayError::DecisionTimeout { .. }))
        ));
        assert_eq!(wrapped.pending_count(), 0);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resume_unknown_request() {
        let (tool, _calls) = recording_tool();
        let wrapped =
            InterceptedTool::new(Arc::new(MockGateway::allow()), "send_email", tool);

        let result = wrapped
            .resume("missing", Decision::Approved { revised_request: None })
            .await;
        assert!(matches!(result, Err(InterceptError::UnknownRequest(_))));
    }

    #[tokio::test]
    async fn test_tool_error_surfaces() {
        let tool = tool_fn(|_args| async move {
            Err::<Value, BoxError>("smtp unreachable".into())
        });
        let wrapped = InterceptedTool::new(Arc::new(MockGateway::allow()), "send_email", tool);

        let result = wrapped.call(Map::new(), Some(&ctx())).await;
        match result {
            Err(InterceptError::Tool(message)) => assert_eq!(message, "smtp unreachable"),
            other => panic!("Expected tool error, got {:?}", other),
        }
    }
}
