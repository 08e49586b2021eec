//! Decision wait state machine
//!
//! Drives repeated polling of a [`PolicyGateway`] until a terminal decision,
//! timeout, or cancellation: `WAITING -> { RESOLVED, TIMED_OUT, CANCELLED,
//! FAILED }`. Polls are strictly sequential; the deadline is wall clock from
//! the first poll and is not reset by transient transport retries.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::{GatewayError, Result};
use crate::gateway::PolicyGateway;
use crate::protocol::{Decision, PollOutcome};

/// Fallback timeout when neither an explicit timeout nor an expiry is known
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_TRANSPORT_RETRIES: u32 = 3;

/// Options for one wait loop
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Wall-clock deadline, measured from the first poll
    pub timeout: Duration,
    /// Fixed sleep between polls
    pub poll_interval: Duration,
    /// Consecutive transient transport failures tolerated before FAILED
    pub max_transport_retries: u32,
    /// Cooperative cancellation, checked at every suspension point
    pub cancel: CancellationToken,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_transport_retries: DEFAULT_TRANSPORT_RETRIES,
            cancel: CancellationToken::new(),
        }
    }
}

impl WaitOptions {
    /// Create options with an explicit timeout and poll interval
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
            ..Self::default()
        }
    }

    /// Derive the timeout from a gateway expiry timestamp
    ///
    /// Adds a 5 second buffer past the expiry and clamps to a 10 second
    /// minimum; falls back to 600 seconds when no expiry is known.
    pub fn until(expires_at: Option<DateTime<Utc>>) -> Self {
        let timeout = match expires_at {
            Some(expiry) => {
                let remaining = (expiry - Utc::now()).num_seconds() + 5;
                Duration::from_secs(remaining.max(10) as u64)
            }
            None => DEFAULT_TIMEOUT,
        };
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Set the poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the transient transport retry budget
    pub fn with_max_transport_retries(mut self, retries: u32) -> Self {
        self.max_transport_retries = retries;
        self
    }

    /// Attach a cancellation token
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Poll the gateway until a terminal decision, timeout, or cancellation
///
/// A transient transport failure does not immediately fail the wait; it is
/// retried at the same interval up to the configured budget, then escalated
/// with the underlying error. Timeout and cancellation are reported, never
/// swallowed — the underlying tool call must remain un-executed.
pub async fn wait_for_decision<G: PolicyGateway + ?Sized>(
    gateway: &G,
    request_id: &str,
    options: &WaitOptions,
) -> Result<Decision> {
    let started = tokio::time::Instant::now();
    let mut transport_failures = 0u32;

    loop {
        if options.cancel.is_cancelled() {
            tracing::info!(request_id, "Decision wait cancelled");
            return Err(GatewayError::WaitCancelled {
                request_id: request_id.to_string(),
            });
        }

        let elapsed = started.elapsed();
        if elapsed >= options.timeout {
            tracing::warn!(request_id, ?elapsed, "Decision wait timed out");
            return Err(GatewayError::DecisionTimeout {
                request_id: request_id.to_string(),
                elapsed,
            });
        }

        let poll = tokio::select! {
            _ = options.cancel.cancelled() => {
                tracing::info!(request_id, "Decision wait cancelled during poll");
                return Err(GatewayError::WaitCancelled {
                    request_id: request_id.to_string(),
                });
            }
            result = gateway.poll_decision(request_id) => result,
        };

        match poll {
            Ok(PollOutcome::Resolved(decision)) => {
                tracing::info!(request_id, ?decision, "Decision resolved");
                return Ok(decision);
            }
            Ok(PollOutcome::Pending) => {
                transport_failures = 0;
            }
            Err(e) if e.is_transient() && transport_failures < options.max_transport_retries => {
                transport_failures += 1;
                tracing::warn!(
                    request_id,
                    attempt = transport_failures,
                    error = %e,
                    "Transient poll failure, retrying"
                );
            }
            Err(e) => return Err(e),
        }

        tokio::select! {
            _ = options.cancel.cancelled() => {
                tracing::info!(request_id, "Decision wait cancelled during sleep");
                return Err(GatewayError::WaitCancelled {
                    request_id: request_id.to_string(),
                });
            }
            _ = tokio::time::sleep(options.poll_interval) => {}
        }
    }
}
