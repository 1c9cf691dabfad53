//! HTTP transport with bounded timeout and bounded retry.
//!
//! One request primitive for the governance service. Each attempt runs
//! under a hard deadline enforced by the HTTP client (the in-flight request
//! is aborted when it fires), and attempts are separated by a fixed backoff
//! delay, deliberately not exponential: the retry budget is one extra
//! attempt by default, there is nothing to spread out.
//!
//! ## Retry policy
//!
//! - Connection failure or per-attempt timeout: retry until the budget is
//!   spent, then fail with the last observed error.
//! - HTTP 5xx or 408: retry; when the budget is spent the response itself
//!   is returned so the caller can read the status and body.
//! - Any other status, 4xx included: returned immediately, no retry.

use std::time::Duration;

use reqwest::{Client, Method, Request, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::error::GateError;

/// Fixed delay between attempts.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Configuration for the transport layer.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Hard deadline per attempt
    pub timeout: Duration,
    /// Extra attempts after the first (1 means two attempts total)
    pub max_retries: u32,
    /// Delay between attempts
    pub backoff: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5_000),
            max_retries: 1,
            backoff: RETRY_BACKOFF,
        }
    }
}

/// HTTP transport for the governance service.
///
/// `Clone` is cheap: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    config: TransportConfig,
}

impl Transport {
    /// Build a transport with its own pooled HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::ClientBuild`] if the client cannot be built.
    pub fn new(config: TransportConfig) -> Result<Self, GateError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| GateError::ClientBuild {
                details: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// Start a request against the governance service.
    ///
    /// The builder inherits the transport deadline; callers may override it
    /// per request (the approval poller uses a shorter one).
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send a request, retrying per the transport policy.
    ///
    /// Any response received on the final attempt is returned as-is, even a
    /// 5xx. Connection-level failure on the final attempt maps to
    /// [`GateError::Connect`] or [`GateError::Timeout`].
    pub async fn send(&self, request: Request) -> Result<Response, GateError> {
        let url = request.url().to_string();
        let max_attempts = self.config.max_retries.saturating_add(1);
        let mut next = Some(request);

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.config.backoff).await;
            }
            let Some(current) = next.take() else { break };
            // The final attempt consumes the original request; earlier ones
            // send a clone so a retry still has something to re-send.
            let request = if attempt == max_attempts {
                current
            } else {
                match current.try_clone() {
                    Some(clone) => {
                        next = Some(current);
                        clone
                    }
                    None => current,
                }
            };
            let last = next.is_none();

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() || last || !is_retryable_status(status) {
                        debug!(url = %url, status = %status, attempt, "governance request completed");
                        return Ok(response);
                    }
                    warn!(url = %url, status = %status, attempt, "retryable status from governance service");
                }
                Err(error) => {
                    let classified = self.classify_error(error, &url);
                    if last {
                        return Err(classified);
                    }
                    warn!(url = %url, error = %classified, attempt, "governance request failed, retrying");
                }
            }
        }

        Err(GateError::Connect {
            url,
            reason: "retry budget exhausted without a response".to_string(),
        })
    }

    fn classify_error(&self, error: reqwest::Error, url: &str) -> GateError {
        if error.is_timeout() {
            GateError::Timeout {
                url: url.to_string(),
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            GateError::Connect {
                url: url.to_string(),
                reason: error.to_string(),
            }
        }
    }
}

/// Whether an HTTP status is worth another attempt.
///
/// Server-side failures and 408 are treated as transient; client errors
/// never are.
#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT
}
