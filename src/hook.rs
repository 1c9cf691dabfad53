//! Host-runtime surface: the before-tool-call interceptor.
//!
//! The host runtime invokes [`GateHook::before_tool_call`] once per tool
//! call with the event (tool name and parameters) and call context. The
//! hook builds the [`ProposedAction`], asks the gate for a verdict, and
//! answers in the host's terms: nothing for "proceed", a [`BlockDecision`]
//! for "blocked".

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{ActionContext, ProposedAction};
use crate::category;
use crate::config::{GateConfig, PLUGIN_ID, runtime_id};
use crate::error::GateError;
use crate::gate::GovernanceGate;
use crate::verdict::Verdict;

/// Operation name recorded for intercepted tool calls.
const HOOK_OPERATION: &str = "run";

/// A tool call the host runtime is about to perform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallEvent {
    /// Name of the tool being invoked
    pub tool_name: String,
    /// Tool parameters, passed through opaquely
    pub params: Value,
}

/// Call context the host runtime supplies alongside the event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolCallContext {
    /// Identity of the calling agent, when the host knows it
    pub agent_id: Option<String>,
    /// Host session the call belongs to
    pub session_key: Option<String>,
    /// Tool name as the host routed it
    pub tool_name: String,
}

/// Instruction to the host runtime to block the tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDecision {
    /// Always true; present for the host's verdict shape
    pub block: bool,
    /// Human-readable reason shown in place of the tool result
    pub block_reason: String,
}

/// The governance interceptor a host runtime registers.
pub struct GateHook {
    gate: GovernanceGate,
    runtime_id: String,
}

impl GateHook {
    /// Build a hook (and its gate) from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: GateConfig) -> Result<Self, GateError> {
        Ok(Self::with_gate(GovernanceGate::new(config)?))
    }

    /// Build a hook from whatever config value the host runtime hands over.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn from_host_value(host: &Value) -> Result<Self, GateError> {
        Self::new(GateConfig::from_host_value(host))
    }

    /// Build a hook over an existing gate (tests inject mocks here).
    #[must_use]
    pub fn with_gate(gate: GovernanceGate) -> Self {
        Self {
            gate,
            runtime_id: runtime_id(),
        }
    }

    /// Intercept one tool call.
    ///
    /// `None` means the tool call proceeds untouched; `Some` carries the
    /// block reason the host should surface instead of running the tool.
    pub async fn before_tool_call(
        &self,
        event: &ToolCallEvent,
        ctx: &ToolCallContext,
    ) -> Option<BlockDecision> {
        let action = self.proposed_action(event, ctx);
        match self.gate.decide(&action).await {
            Verdict::Proceed => None,
            Verdict::Blocked { reason, .. } => Some(BlockDecision {
                block: true,
                block_reason: reason,
            }),
        }
    }

    /// Describe the tool call as a governance action.
    fn proposed_action(&self, event: &ToolCallEvent, ctx: &ToolCallContext) -> ProposedAction {
        let agent_id = self
            .gate
            .config()
            .agent_id_override
            .clone()
            .or_else(|| ctx.agent_id.clone())
            .unwrap_or_else(|| PLUGIN_ID.to_string());

        ProposedAction {
            agent_id,
            tool: event.tool_name.clone(),
            operation: HOOK_OPERATION.to_string(),
            params: event.params.clone(),
            context: ActionContext {
                session_key: ctx.session_key.clone(),
                source: PLUGIN_ID.to_string(),
                category: category::resolve(&event.tool_name).to_string(),
                runtime_id: self.runtime_id.clone(),
                tenant_id: None,
            },
        }
    }
}
