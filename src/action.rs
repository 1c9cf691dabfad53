//! Proposed actions and the records the governance service answers with.
//!
//! A [`ProposedAction`] is built once per intercepted tool call and
//! serialized verbatim as the submission payload. The service answers with
//! an [`ActionRecord`] snapshot; the client never mutates it, only reads.

use serde::{Deserialize, Serialize};

/// Tenant used when the action context does not carry one.
pub const DEFAULT_TENANT: &str = "demo";

// ============================================================================
// Proposed Action
// ============================================================================

/// A tool invocation awaiting a governance verdict.
///
/// Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedAction {
    /// Identity of the agent attempting the call
    pub agent_id: String,
    /// Name of the tool being invoked
    pub tool: String,
    /// Operation within the tool (always "run" for host hooks)
    pub operation: String,
    /// Tool parameters, passed through opaquely
    pub params: serde_json::Value,
    /// Caller context threaded to the service unchanged
    pub context: ActionContext,
}

/// Context describing where a proposed action came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionContext {
    /// Host session the call belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
    /// Which integration produced the action
    pub source: String,
    /// Coarse tool category (bash, filesystem, browser, network, ...)
    pub category: String,
    /// Machine identity of the runtime host
    pub runtime_id: String,
    /// Multi-tenancy scope; requests default to [`DEFAULT_TENANT`] without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl ProposedAction {
    /// Tenant for request scoping, defaulting when the context omits one.
    #[must_use]
    pub fn tenant(&self) -> &str {
        self.context.tenant_id.as_deref().unwrap_or(DEFAULT_TENANT)
    }
}

// ============================================================================
// Action Record
// ============================================================================

/// Snapshot of the service-side record for one submitted action.
///
/// The service is free to answer with either `id` or `action_id`, and with
/// either `status` or `decision`; both pairs are tolerated. A record lacking
/// both id fields is still usable, it just cannot be polled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionRecord {
    /// Server-assigned action id
    pub id: Option<String>,
    /// Alternate field some service versions use for the id
    pub action_id: Option<String>,
    /// Decision status text
    pub status: Option<String>,
    /// Alternate field some service versions use for the status
    pub decision: Option<String>,
    /// Why the decision came out the way it did
    pub reason: Option<String>,
    /// Machine-readable code for the reason
    pub reason_code: Option<String>,
    /// Category the service filed the action under
    pub category: Option<String>,
    /// Risk assessment, passed through opaquely
    pub risk_level: Option<String>,
    /// Final outcome marker, passed through opaquely
    pub outcome: Option<String>,
    /// Token minted on approval, passed through opaquely
    pub approval_token: Option<String>,
}

impl ActionRecord {
    /// Server-assigned action id, whichever field carried it.
    #[must_use]
    pub fn assigned_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.action_id.as_deref())
    }

    /// Normalized decision, reading `status` and falling back to `decision`.
    #[must_use]
    pub fn decision(&self) -> Decision {
        Decision::parse(self.status.as_deref().or(self.decision.as_deref()))
    }
}

// ============================================================================
// Decision
// ============================================================================

/// Normalized decision vocabulary of the governance service.
///
/// All status-text interpretation goes through [`Decision::parse`] so the
/// gate and the approval waiter agree on the vocabulary instead of scattering
/// string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// "allowed" | "allow": policy allows the action immediately
    Allow,
    /// "approved": a human approved a previously pending action
    Approved,
    /// "denied" | "deny": denied by policy or by a human
    Deny,
    /// "pending": waiting on human review
    Pending,
    /// Anything else, including an absent status
    Unknown,
}

impl Decision {
    /// Parse a raw status string, case-insensitively.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unknown;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "allowed" | "allow" => Self::Allow,
            "approved" => Self::Approved,
            "denied" | "deny" => Self::Deny,
            "pending" => Self::Pending,
            _ => Self::Unknown,
        }
    }
}
