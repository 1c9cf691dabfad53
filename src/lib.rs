//! actiongate - governance-decision client for agent tool calls.
//!
//! Routes every proposed tool invocation through a remote governance
//! service for an allow/deny/pending decision, and coordinates the
//! human-approval wait protocol when a decision is pending. Every tool
//! call is recorded with the service for audit, whatever the outcome.
//!
//! # Decision paths
//!
//! - **Allow:** the tool call proceeds, nothing is shown to the agent.
//! - **Deny:** blocked immediately, by policy or by a human reviewer.
//! - **Pending:** blocked with an approve-and-retry message, or held while
//!   the waiter polls for a human decision within a configured budget.
//! - **Unreachable:** the configured fail-closed/fail-open policy decides.
//!
//! # Integration
//!
//! The host runtime registers a [`hook::GateHook`] and invokes it before
//! each tool call; everything else hangs off [`gate::GovernanceGate`],
//! which presents one never-raising `decide` call per action. Decisions
//! are independent and may run concurrently; there is no shared mutable
//! state between them.

pub mod action;
pub mod approval;
pub mod category;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod hook;
pub mod transport;
pub mod verdict;

pub use action::{ActionContext, ActionRecord, Decision, ProposedAction};
pub use approval::{ApprovalWaiter, WaitConfig, WaitOutcome};
pub use client::{ActionApi, ActionClient, StatusSnapshot};
pub use config::{GateConfig, RawGateConfig};
pub use error::GateError;
pub use gate::GovernanceGate;
pub use hook::{BlockDecision, GateHook, ToolCallContext, ToolCallEvent};
pub use verdict::{BlockKind, Verdict};
