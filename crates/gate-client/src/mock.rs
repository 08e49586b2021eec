//! Mock policy gateway for testing
//!
//! Scriptable implementation of [`PolicyGateway`] so callers can exercise
//! the wait loop and interception paths without a network. Counts every
//! call, records the last revision, and replays a scripted sequence of poll
//! outcomes.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::context::ToolCallContext;
use crate::error::Result;
use crate::gateway::PolicyGateway;
use crate::protocol::{
    EvaluationAction, EvaluationResult, PollOutcome, ProposalRevision, RevisionAccepted,
};

/// What `before_execute` should return
#[derive(Debug, Clone)]
enum EvaluationMode {
    Allow,
    Deny(String),
    RequireApproval(String),
}

/// Scriptable gateway for automated testing
pub struct MockGateway {
    evaluation: EvaluationMode,
    poll_script: Mutex<VecDeque<Result<PollOutcome>>>,
    revision_result: Mutex<Option<Result<RevisionAccepted>>>,
    submit_count: AtomicUsize,
    poll_count: AtomicUsize,
    revision_count: AtomicUsize,
    last_revision: Mutex<Option<ProposalRevision>>,
}

impl MockGateway {
    fn with_mode(evaluation: EvaluationMode) -> Self {
        Self {
            evaluation,
            poll_script: Mutex::new(VecDeque::new()),
            revision_result: Mutex::new(None),
            submit_count: AtomicUsize::new(0),
            poll_count: AtomicUsize::new(0),
            revision_count: AtomicUsize::new(0),
            last_revision: Mutex::new(None),
        }
    }

    /// Gateway that allows every submission
    pub fn allow() -> Self {
        Self::with_mode(EvaluationMode::Allow)
    }

    /// Gateway that denies every submission
    pub fn deny<S: Into<String>>(reason: S) -> Self {
        Self::with_mode(EvaluationMode::Deny(reason.into()))
    }

    /// Gateway that suspends every submission under the given request id
    ///
    /// Polls replay the script set via [`with_poll_script`]; once the
    /// script is exhausted the request stays pending forever.
    ///
    /// [`with_poll_script`]: MockGateway::with_poll_script
    pub fn require_approval<S: Into<String>>(request_id: S) -> Self {
        Self::with_mode(EvaluationMode::RequireApproval(request_id.into()))
    }

    /// Script the sequence of poll outcomes
    pub fn with_poll_script(self, script: Vec<Result<PollOutcome>>) -> Self {
        *self.poll_script.lock().expect("poll script lock") = script.into();
        self
    }

    /// Script the revision response
    pub fn with_revision_result(self, result: Result<RevisionAccepted>) -> Self {
        *self.revision_result.lock().expect("revision result lock") = Some(result);
        self
    }

    /// Number of submissions observed
    pub fn submit_count(&self) -> usize {
        self.submit_count.load(Ordering::SeqCst)
    }

    /// Number of polls observed
    pub fn poll_count(&self) -> usize {
        self.poll_count.load(Ordering::SeqCst)
    }

    /// Number of revisions observed
    pub fn revision_count(&self) -> usize {
        self.revision_count.load(Ordering::SeqCst)
    }

    /// The most recent revision submitted, if any
    pub fn last_revision(&self) -> Option<ProposalRevision> {
        self.last_revision.lock().expect("last revision lock").clone()
    }
}

#[async_trait]
impl PolicyGateway for MockGateway {
    async fn before_execute(
        &self,
        _tool_name: &str,
        _tool_args: &Map<String, Value>,
        _context: &ToolCallContext,
    ) -> Result<EvaluationResult> {
        self.submit_count.fetch_add(1, Ordering::SeqCst);

        let result = match &self.evaluation {
            EvaluationMode::Allow => EvaluationResult {
                request_id: "allowed".to_string(),
                action: EvaluationAction::Allow,
                reason: None,
                expires_at: None,
            },
            EvaluationMode::Deny(reason) => EvaluationResult {
                request_id: "denied".to_string(),
                action: EvaluationAction::Deny,
                reason: Some(reason.clone()),
                expires_at: None,
            },
            EvaluationMode::RequireApproval(request_id) => EvaluationResult {
                request_id: request_id.clone(),
                action: EvaluationAction::RequireApproval,
                reason: Some("Awaiting human approval".to_string()),
                expires_at: None,
            },
        };
        Ok(result)
    }

    async fn poll_decision(&self, _request_id: &str) -> Result<PollOutcome> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        self.poll_script
            .lock()
            .expect("poll script lock")
            .pop_front()
            .unwrap_or(Ok(PollOutcome::Pending))
    }

    async fn submit_revision(
        &self,
        _request_id: &str,
        revision: ProposalRevision,
    ) -> Result<RevisionAccepted> {
        self.revision_count.fetch_add(1, Ordering::SeqCst);
        let version_from = revision.version_from;
        *self.last_revision.lock().expect("last revision lock") = Some(revision);

        self.revision_result
            .lock()
            .expect("revision result lock")
            .take()
            .unwrap_or(Ok(RevisionAccepted {
                version: version_from + 1,
            }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
