//! Decision engine: one synchronous verdict per proposed action.
//!
//! ## Decision flow
//!
//! ```text
//! decide(action)
//!     |
//!     v
//! submit to /v1/actions --error--> fail-closed? Blocked(unreachable)
//!     |                            fail-open?   Proceed
//!     v
//! normalized decision
//!     +- allow -----> Proceed
//!     +- deny ------> Blocked (policy message, or human message when the
//!     |               denial came from a reviewer)
//!     +- otherwise -> pending:
//!            +- no wait budget, or no action id -> Blocked (pending)
//!            +- wait budget and id -> poll until approved / denied / deadline
//! ```
//!
//! The public contract never raises. Every failure path becomes a verdict,
//! and fail-open/fail-closed applies at the single point where the remote
//! service could not be reached at all.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::action::{ActionRecord, Decision, ProposedAction};
use crate::approval::{ApprovalWaiter, WaitConfig, WaitOutcome};
use crate::client::{ActionApi, ActionClient};
use crate::config::GateConfig;
use crate::error::GateError;
use crate::verdict::{
    BlockKind, Verdict, human_denied_message, pending_message, policy_deny_message,
    timeout_message, unreachable_message,
};

/// Reason code the service uses for denials made by a human reviewer.
const HUMAN_DENIED_CODE: &str = "human_denied";

/// Fallback reason code when the service supplies none.
const DEFAULT_DENY_CODE: &str = "actiongate-deny";

/// Orchestrates submission, interpretation, and the approval wait into a
/// single verdict.
///
/// Each `decide` call is independent: the gate holds no per-call state and
/// may be shared across concurrent decisions. Serializing conflicting
/// policy decisions is the remote service's job, not this client's.
pub struct GovernanceGate {
    client: Arc<dyn ActionApi>,
    waiter: ApprovalWaiter,
    config: GateConfig,
}

impl GovernanceGate {
    /// Build a gate with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: GateConfig) -> Result<Self, GateError> {
        let client: Arc<dyn ActionApi> = Arc::new(ActionClient::new(&config)?);
        Ok(Self::with_client(client, config))
    }

    /// Build a gate over an existing client (tests inject mocks here).
    #[must_use]
    pub fn with_client(client: Arc<dyn ActionApi>, config: GateConfig) -> Self {
        let waiter = ApprovalWaiter::new(client.clone(), WaitConfig::default());
        Self {
            client,
            waiter,
            config,
        }
    }

    /// Builder-style override of the approval poll cadence.
    #[must_use]
    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.waiter = ApprovalWaiter::new(self.client.clone(), wait);
        self
    }

    /// Resolved configuration in effect for this gate.
    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Decide one proposed action.
    ///
    /// Presents one blocking call to the caller; internally it suspends
    /// while awaiting network I/O and timers. Network calls within one
    /// decision are strictly sequential: submit, then zero or more polls.
    pub async fn decide(&self, action: &ProposedAction) -> Verdict {
        let record = match self.client.submit(action).await {
            Ok(record) => record,
            Err(error) => return self.unreachable_verdict(action, &error),
        };

        match record.decision() {
            Decision::Allow => {
                debug!(tool = %action.tool, "action allowed");
                Verdict::Proceed
            }
            Decision::Deny => self.deny_verdict(action, &record),
            Decision::Approved | Decision::Pending | Decision::Unknown => {
                self.pending_verdict(action, &record).await
            }
        }
    }

    /// Immediate denial: classify human vs. policy and format accordingly.
    fn deny_verdict(&self, action: &ProposedAction, record: &ActionRecord) -> Verdict {
        let reason = record
            .reason
            .clone()
            .unwrap_or_else(|| format!("Blocked by policy ({})", action.tool));
        let code = record
            .reason_code
            .clone()
            .unwrap_or_else(|| DEFAULT_DENY_CODE.to_string());
        let category = record
            .category
            .clone()
            .unwrap_or_else(|| action.context.category.clone());

        if code.eq_ignore_ascii_case(HUMAN_DENIED_CODE) || is_human_denial(&reason) {
            info!(tool = %action.tool, "action denied by human reviewer");
            Verdict::Blocked {
                reason: human_denied_message(&self.config.dashboard_url),
                kind: BlockKind::HumanDenied,
            }
        } else {
            info!(tool = %action.tool, reason = %reason, code = %code, "action denied by policy");
            Verdict::Blocked {
                reason: policy_deny_message(&reason, &code, &category, &self.config.dashboard_url),
                kind: BlockKind::PolicyDenied,
            }
        }
    }

    /// Pending decision: block with instructions, or drive the approval
    /// wait when a budget is configured and the record can be polled.
    async fn pending_verdict(&self, action: &ProposedAction, record: &ActionRecord) -> Verdict {
        let wait_budget = self.config.wait_for_approval;
        let Some(action_id) = record.assigned_id() else {
            // No id came back; nothing to poll, whatever the budget says.
            info!(tool = %action.tool, "action pending with no id to poll");
            return Verdict::Blocked {
                reason: pending_message(None, &self.config.dashboard_url),
                kind: BlockKind::Pending,
            };
        };

        if wait_budget.is_zero() {
            info!(tool = %action.tool, action_id, "action pending, approval wait disabled");
            return Verdict::Blocked {
                reason: pending_message(Some(action_id), &self.config.dashboard_url),
                kind: BlockKind::Pending,
            };
        }

        info!(
            tool = %action.tool,
            action_id,
            wait_ms = wait_budget.as_millis() as u64,
            "action pending, waiting for approval"
        );
        match self.waiter.wait(action_id, action.tenant(), wait_budget).await {
            WaitOutcome::Approved => Verdict::Proceed,
            WaitOutcome::Denied => Verdict::Blocked {
                reason: human_denied_message(&self.config.dashboard_url),
                kind: BlockKind::HumanDenied,
            },
            WaitOutcome::TimedOut => Verdict::Blocked {
                reason: timeout_message(action_id, &self.config.dashboard_url),
                kind: BlockKind::PendingTimeout,
            },
        }
    }

    /// The service could not be reached at all; the configured safety
    /// policy picks the verdict.
    fn unreachable_verdict(&self, action: &ProposedAction, error: &GateError) -> Verdict {
        if self.config.fail_closed {
            warn!(tool = %action.tool, error = %error, "governance service unreachable, failing closed");
            Verdict::Blocked {
                reason: unreachable_message(&error.to_string()),
                kind: BlockKind::Unreachable,
            }
        } else {
            warn!(tool = %action.tool, error = %error, "governance service unreachable, failing open");
            Verdict::Proceed
        }
    }
}

/// Matches denial reasons written by a human reviewer rather than policy.
fn is_human_denial(reason: &str) -> bool {
    reason.to_ascii_lowercase().contains("human")
}

// ============================================================================
// Tests
// ============================================================================
