//! Human-approval wait protocol.
//!
//! After a pending decision the waiter polls the action status until a
//! terminal outcome or a wall-clock deadline. The deadline is computed once
//! at entry and never restarted; each poll call carries its own short
//! timeout (see the client), so one stuck lookup cannot stall the loop far
//! past the budget.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::action::Decision;
use crate::client::ActionApi;

/// Terminal result of one approval wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// A human approved the action, or policy flipped it to allowed
    Approved,
    /// A human denied the action
    Denied,
    /// The deadline elapsed without a terminal status
    TimedOut,
}

/// Poll cadence for the wait loop.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Delay between consecutive status polls
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// Polls one action until approved, denied, or out of time.
pub struct ApprovalWaiter {
    client: Arc<dyn ActionApi>,
    config: WaitConfig,
}

impl ApprovalWaiter {
    #[must_use]
    pub fn new(client: Arc<dyn ActionApi>, config: WaitConfig) -> Self {
        Self { client, config }
    }

    /// Wait for a terminal outcome on `action_id` within `budget`.
    ///
    /// Status lookups are best-effort; an absent or unrecognized status
    /// keeps the loop polling until the deadline.
    pub async fn wait(&self, action_id: &str, tenant: &str, budget: Duration) -> WaitOutcome {
        let deadline = Instant::now() + budget;
        while Instant::now() < deadline {
            let snapshot = self.client.status(action_id, tenant).await;
            match snapshot.decision() {
                Decision::Allow | Decision::Approved => {
                    debug!(action_id, "approval granted");
                    return WaitOutcome::Approved;
                }
                Decision::Deny => {
                    debug!(action_id, "approval denied");
                    return WaitOutcome::Denied;
                }
                Decision::Pending | Decision::Unknown => {}
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
        debug!(
            action_id,
            budget_ms = budget.as_millis() as u64,
            "approval wait deadline elapsed"
        );
        WaitOutcome::TimedOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionRecord, ProposedAction};
    use crate::client::StatusSnapshot;
    use crate::error::GateError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::Mutex;

    /// Scripted status source: answers each poll from a queue, then keeps
    /// answering with no status at all.
    struct ScriptedStatus {
        statuses: Mutex<VecDeque<Option<&'static str>>>,
        polls: AtomicU32,
    }

    impl ScriptedStatus {
        fn new(statuses: impl IntoIterator<Item = Option<&'static str>>) -> Arc<Self> {
            Arc::new(Self {
                statuses: Mutex::new(statuses.into_iter().collect()),
                polls: AtomicU32::new(0),
            })
        }

        fn polls(&self) -> u32 {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ActionApi for ScriptedStatus {
        async fn submit(&self, _action: &ProposedAction) -> Result<ActionRecord, GateError> {
            Ok(ActionRecord::default())
        }

        async fn status(&self, _action_id: &str, _tenant: &str) -> StatusSnapshot {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let next = self.statuses.lock().await.pop_front().flatten();
            StatusSnapshot {
                status: next.map(str::to_string),
            }
        }
    }

    fn waiter(client: Arc<ScriptedStatus>) -> ApprovalWaiter {
        ApprovalWaiter::new(client, WaitConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_approved_on_first_poll() {
        let client = ScriptedStatus::new([Some("approved")]);
        let outcome = waiter(client.clone())
            .wait("act-1", "demo", Duration::from_secs(30))
            .await;
        assert_eq!(outcome, WaitOutcome::Approved);
        assert_eq!(client.polls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_allowed_also_counts_as_approval() {
        let client = ScriptedStatus::new([Some("allowed")]);
        let outcome = waiter(client.clone())
            .wait("act-1", "demo", Duration::from_secs(30))
            .await;
        assert_eq!(outcome, WaitOutcome::Approved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_terminates_the_wait() {
        let client = ScriptedStatus::new([Some("pending"), Some("denied")]);
        let outcome = waiter(client.clone())
            .wait("act-1", "demo", Duration::from_secs(30))
            .await;
        assert_eq!(outcome, WaitOutcome::Denied);
        assert_eq!(client.polls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deny_variant_terminates_too() {
        let client = ScriptedStatus::new([Some("deny")]);
        let outcome = waiter(client.clone())
            .wait("act-1", "demo", Duration::from_secs(30))
            .await;
        assert_eq!(outcome, WaitOutcome::Denied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_status_keeps_polling() {
        let client = ScriptedStatus::new([None, None, Some("approved")]);
        let outcome = waiter(client.clone())
            .wait("act-1", "demo", Duration::from_secs(30))
            .await;
        assert_eq!(outcome, WaitOutcome::Approved);
        assert_eq!(client.polls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses_without_terminal_status() {
        let client = ScriptedStatus::new([]);
        let outcome = waiter(client.clone())
            .wait("act-1", "demo", Duration::from_secs(10))
            .await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
        // 10s budget at a 2s interval: polls at 0, 2, 4, 6, 8.
        assert_eq!(client.polls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_budget_never_polls() {
        let client = ScriptedStatus::new([Some("approved")]);
        let outcome = waiter(client.clone())
            .wait("act-1", "demo", Duration::ZERO)
            .await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert_eq!(client.polls(), 0);
    }
}
