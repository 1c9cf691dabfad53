//! Final verdicts and the block messages shown to the calling agent.
//!
//! Every blocked verdict carries a message a human can act on: what blocked
//! the call, and where to go (dashboard link, action id) to fix it and
//! retry. Message texts live here so the gate logic stays free of
//! formatting.

/// Why an action was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// The remote policy denied the action outright
    PolicyDenied,
    /// A human reviewer denied the action
    HumanDenied,
    /// The action awaits human approval in the dashboard
    Pending,
    /// The approval wait budget elapsed without a decision
    PendingTimeout,
    /// The governance service could not be reached and the gate fails closed
    Unreachable,
}

/// The gate's output for one proposed action.
///
/// Produced fresh per call; it has no identity beyond the call that made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The tool call may proceed; nothing is shown to the agent
    Proceed,
    /// The tool call is blocked, with a human-readable reason
    Blocked {
        /// Message shown to the agent in place of the tool result
        reason: String,
        /// Which failure category produced the block
        kind: BlockKind,
    },
}

impl Verdict {
    /// True when the action must not run.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Blocked by remote policy (immediate deny).
pub(crate) fn policy_deny_message(
    reason: &str,
    code: &str,
    category: &str,
    dashboard_url: &str,
) -> String {
    format!(
        "[ActionGate DENY] Blocked by policy. Reason: {reason}. Code: {code}. \
         Category: {category}. Manage policy: {dashboard_url}"
    )
}

/// Blocked by a human after pending approval. The denial already happened
/// through direct human action, so no policy reason or code is included.
pub(crate) fn human_denied_message(dashboard_url: &str) -> String {
    format!(
        "[ActionGate DENY] Blocked by human: this action was denied in the \
         governance dashboard. Review at: {dashboard_url}"
    )
}

/// Waiting for human approval in the dashboard.
pub(crate) fn pending_message(action_id: Option<&str>, dashboard_url: &str) -> String {
    let id_part = action_id
        .map(|id| format!(" Action ID: {id}."))
        .unwrap_or_default();
    format!(
        "[ActionGate PENDING] Waiting for approval.{id_part} \
         Approve at {dashboard_url}, then ask me to try again."
    )
}

/// Approval window expired; the action can still be approved and retried.
pub(crate) fn timeout_message(action_id: &str, dashboard_url: &str) -> String {
    format!(
        "[ActionGate PENDING TIMEOUT] Approval window expired. Action ID: {action_id}. \
         You can still approve at {dashboard_url} and ask me to try again."
    )
}

/// Governance service unreachable under the fail-closed policy.
pub(crate) fn unreachable_message(error: &str) -> String {
    format!("[ActionGate ERROR] Governance service unreachable (fail-closed). {error}")
}
