//! Caller-supplied context for a tool call

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Risk level declared by the caller for an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Read operations, safe lookups
    Low,
    /// Write operations, outbound API calls
    Medium,
    /// Deletes, money movement, external recipients
    High,
    /// System-level or irreversible operations
    Critical,
}

/// Rendering hints for approval UIs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayHints {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sections: Vec<serde_json::Value>,
}

/// Structured context identifying the origin of a tool call
///
/// Immutable once constructed; created by the caller at invocation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallContext {
    /// Originating agent
    pub agent_id: String,
    /// Workflow run
    pub run_id: String,
    /// Step within the run
    pub step_id: String,
    /// Caller-declared risk level
    pub risk_level: RiskLevel,
    /// Free-text summary shown to approvers
    #[serde(default)]
    pub context_summary: String,
    /// Optional classification tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Deduplication key for resubmissions
    pub idempotency_key: String,
    /// Webhook URL notified when a decision lands
    #[serde(default)]
    pub decision_url: String,
    /// Arbitrary key/value metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Optional rendering hints for approval UIs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayHints>,
}

impl ToolCallContext {
    /// Create a context for the given agent and run
    ///
    /// Defaults: `step_id` = "step", `risk_level` = Medium, a fresh UUID v4
    /// idempotency key, and empty summary/tags/metadata.
    pub fn new<S: Into<String>>(agent_id: S, run_id: S) -> Self {
        Self {
            agent_id: agent_id.into(),
            run_id: run_id.into(),
            step_id: "step".to_string(),
            risk_level: RiskLevel::Medium,
            context_summary: String::new(),
            tags: Vec::new(),
            idempotency_key: uuid::Uuid::new_v4().to_string(),
            decision_url: String::new(),
            metadata: HashMap::new(),
            display: None,
        }
    }

    /// Set the step identifier
    pub fn with_step_id<S: Into<String>>(mut self, step_id: S) -> Self {
        self.step_id = step_id.into();
        self
    }

    /// Set the risk level
    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    /// Set the free-text summary
    pub fn with_summary<S: Into<String>>(mut self, summary: S) -> Self {
        self.context_summary = summary.into();
        self
    }

    /// Add a classification tag
    pub fn with_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the idempotency key
    pub fn with_idempotency_key<S: Into<String>>(mut self, key: S) -> Self {
        self.idempotency_key = key.into();
        self
    }

    /// Set the decision webhook URL
    pub fn with_decision_url<S: Into<String>>(mut self, url: S) -> Self {
        self.decision_url = url.into();
        self
    }

    /// Add a metadata entry
    pub fn with_metadata<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set display hints
    pub fn with_display(mut self, display: DisplayHints) -> Self {
        self.display = Some(display);
        self
    }
}
