//! Action submission and status lookup against the governance service.
//!
//! Two endpoints, two temperaments. `submit` must reach the service: every
//! proposed action is recorded remotely for audit whatever the outcome, so
//! there is no local short-circuit and failures are loud. `status` is a
//! best-effort read: any failure collapses to "still unknown" so a flaky
//! lookup can never abort an approval wait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::{ActionRecord, Decision, ProposedAction};
use crate::config::GateConfig;
use crate::error::GateError;
use crate::transport::{Transport, TransportConfig};

/// Per-call deadline for status lookups, independent of the wait budget.
pub(crate) const STATUS_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest error-body excerpt carried into a [`GateError::Service`].
const ERROR_BODY_LIMIT: usize = 2048;

/// Point-in-time status answer from the service.
///
/// An absent status means "still unknown", never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    /// Current status text, if the service reported one
    pub status: Option<String>,
}

impl StatusSnapshot {
    /// Normalized decision for this snapshot.
    #[must_use]
    pub fn decision(&self) -> Decision {
        Decision::parse(self.status.as_deref())
    }
}

/// Client seam for the governance action endpoints.
///
/// The gate and the approval waiter depend on this trait rather than the
/// concrete client, so tests can inject mocks without making HTTP requests.
#[async_trait]
pub trait ActionApi: Send + Sync {
    /// Record the proposed action with the service and read its decision.
    async fn submit(&self, action: &ProposedAction) -> Result<ActionRecord, GateError>;

    /// Look up the current status of a recorded action. Best-effort.
    async fn status(&self, action_id: &str, tenant: &str) -> StatusSnapshot;
}

/// HTTP client for the governance action endpoints.
pub struct ActionClient {
    transport: Transport,
    base_url: String,
    api_key: Option<String>,
}

impl ActionClient {
    /// Build a client from the resolved gate configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &GateConfig) -> Result<Self, GateError> {
        let transport = Transport::new(TransportConfig {
            timeout: config.timeout,
            max_retries: config.max_retries,
            ..TransportConfig::default()
        })?;
        Ok(Self {
            transport,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Attach the tenant header and, when configured, the bearer credential.
    fn authorized(&self, builder: RequestBuilder, tenant: &str) -> RequestBuilder {
        let builder = builder.header("X-Tenant-ID", tenant);
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl ActionApi for ActionClient {
    async fn submit(&self, action: &ProposedAction) -> Result<ActionRecord, GateError> {
        let url = format!("{}/v1/actions", self.base_url);
        let request = self
            .authorized(
                self.transport.request(Method::POST, &url).json(action),
                action.tenant(),
            )
            .build()
            .map_err(|e| GateError::Connect {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let response = self.transport.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            return Err(GateError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let record: ActionRecord =
            response
                .json()
                .await
                .map_err(|e| GateError::InvalidResponse {
                    details: e.to_string(),
                })?;
        debug!(
            tool = %action.tool,
            action_id = record.assigned_id().unwrap_or("<none>"),
            "action recorded with governance service"
        );
        Ok(record)
    }

    async fn status(&self, action_id: &str, tenant: &str) -> StatusSnapshot {
        let url = format!("{}/v1/actions/{}", self.base_url, action_id);
        let request = match self
            .authorized(self.transport.request(Method::GET, &url), tenant)
            .timeout(STATUS_TIMEOUT)
            .build()
        {
            Ok(request) => request,
            Err(error) => {
                debug!(action_id, error = %error, "status request could not be built");
                return StatusSnapshot::default();
            }
        };

        match self.transport.send(request).await {
            Ok(response) if response.status().is_success() => {
                response.json().await.unwrap_or_default()
            }
            Ok(response) => {
                debug!(
                    action_id,
                    status = %response.status(),
                    "status lookup non-success, treating as unknown"
                );
                StatusSnapshot::default()
            }
            Err(error) => {
                debug!(action_id, error = %error, "status lookup failed, treating as unknown");
                StatusSnapshot::default()
            }
        }
    }
}

/// Read a failed response's body, truncated; an unreadable body is empty.
async fn read_error_body(response: Response) -> String {
    match response.text().await {
        Ok(body) => body.chars().take(ERROR_BODY_LIMIT).collect(),
        Err(_) => String::new(),
    }
}
