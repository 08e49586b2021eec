//! HTTP implementation of the policy gateway
//!
//! Talks to a remote gateway over three endpoints:
//! - `POST {base}/v1/requests` — submit a tool call for evaluation
//! - `GET  {base}/v1/requests/{id}` — poll for a decision
//! - `POST {base}/v1/requests/{id}/proposal` — revise a pending proposal
//!
//! Every request carries the API key and the tenant/app/environment scope
//! as headers. Only the redacted view of tool arguments is transmitted.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::context::ToolCallContext;
use crate::error::{GatewayError, Result};
use crate::gateway::PolicyGateway;
use crate::protocol::{
    EvaluationResult, PollOutcome, PollResponse, ProposalRevision, RevisionAccepted,
    RevisionResponse, SubmitRequest,
};
use gate_redact::{redact_with, RedactionPolicy};

/// Per-request timeout; retry policy lives in the wait loop, not here
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the policy gateway
///
/// Stateless between calls apart from the connection pool; safe to share
/// across concurrent invocations.
pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
    policy: RedactionPolicy,
}

impl HttpGateway {
    /// Create a gateway client with the default redaction policy
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            policy: RedactionPolicy::default(),
        }
    }

    /// Override the redaction policy
    pub fn with_redaction_policy(mut self, policy: RedactionPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn submit_url(&self) -> String {
        format!("{}/v1/requests", self.config.base_url)
    }

    fn request_url(&self, request_id: &str) -> String {
        format!("{}/v1/requests/{}", self.config.base_url, request_id)
    }

    fn proposal_url(&self, request_id: &str) -> String {
        format!("{}/v1/requests/{}/proposal", self.config.base_url, request_id)
    }

    /// Attach auth and scope headers; sent on every call
    fn scoped(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .timeout(REQUEST_TIMEOUT)
            .header("X-API-KEY", &self.config.api_key)
            .header("X-TENANT-ID", &self.config.tenant_id)
            .header("X-APP-ID", &self.config.app_id)
            .header("X-ENVIRONMENT", &self.config.environment)
    }

    /// Map HTTP status classes onto the error taxonomy
    fn check_status(response: Response, request_id: Option<&str>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(
                request_id.unwrap_or("unknown").to_string(),
            ));
        }
        if status.is_server_error() {
            // Server-side failures are treated as transport: a retry may land
            // on a healthy instance
            return Err(GatewayError::transport(format!(
                "gateway returned {}",
                status
            )));
        }
        Err(GatewayError::protocol(format!("gateway returned {}", status)))
    }
}

#[async_trait]
impl PolicyGateway for HttpGateway {
    async fn before_execute(
        &self,
        tool_name: &str,
        tool_args: &Map<String, Value>,
        context: &ToolCallContext,
    ) -> Result<EvaluationResult> {
        let redacted = redact_with(tool_args, &self.policy);
        if !redacted.redacted_keys.is_empty() {
            tracing::debug!(
                tool_name,
                redacted_keys = ?redacted.redacted_keys,
                "Redacted sensitive arguments before submission"
            );
        }

        let payload = SubmitRequest {
            tool_name,
            tool_args: &redacted.args,
            context,
        };

        let response = self
            .scoped(self.client.post(self.submit_url()))
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;
        let response = Self::check_status(response, None)?;

        let result: EvaluationResult = response
            .json()
            .await
            .map_err(|e| GatewayError::protocol(format!("invalid evaluation response: {}", e)))?;

        tracing::info!(
            tool_name,
            request_id = %result.request_id,
            action = ?result.action,
            "Gateway evaluated tool call"
        );
        Ok(result)
    }

    async fn poll_decision(&self, request_id: &str) -> Result<PollOutcome> {
        let response = self
            .scoped(self.client.get(self.request_url(request_id)))
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;
        let response = Self::check_status(response, Some(request_id))?;

        let poll: PollResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::protocol(format!("invalid poll response: {}", e)))?;
        poll.into_outcome()
    }

    async fn submit_revision(
        &self,
        request_id: &str,
        revision: ProposalRevision,
    ) -> Result<RevisionAccepted> {
        let version_from = revision.version_from;
        let response = self
            .scoped(self.client.post(self.proposal_url(request_id)))
            .json(&revision)
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;

        // A conflict may arrive as 409 with the same body shape
        let response = if response.status() == StatusCode::CONFLICT {
            response
        } else {
            Self::check_status(response, Some(request_id))?
        };

        let body: RevisionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::protocol(format!("invalid revision response: {}", e)))?;
        let accepted = body.into_outcome(version_from)?;

        tracing::info!(
            request_id,
            version = accepted.version,
            "Proposal revision accepted"
        );
        Ok(accepted)
    }

    fn name(&self) -> &str {
        "http"
    }
}
