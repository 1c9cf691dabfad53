//! Error handling for the governance gate.
//!
//! Only transport- and service-level failures are errors. Terminal
//! deny/pending outcomes are verdicts, not errors: the gate converts every
//! submission failure into a [`crate::Verdict`] at its boundary and never
//! raises to the host runtime.

use thiserror::Error;

/// Errors raised by the transport and the action client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Could not reach the governance service after exhausting retries.
    #[error("cannot reach governance service at {url}: {reason}")]
    Connect {
        /// The URL that could not be reached
        url: String,
        /// Description of the connection failure
        reason: String,
    },

    /// No attempt completed within the per-attempt deadline.
    #[error("governance service did not respond within {timeout_ms}ms ({url})")]
    Timeout {
        /// The URL that timed out
        url: String,
        /// The per-attempt deadline in milliseconds
        timeout_ms: u64,
    },

    /// The service answered with a non-success status.
    #[error("governance service returned HTTP {status}: {body}")]
    Service {
        /// The HTTP status code
        status: u16,
        /// Best-effort excerpt of the response body
        body: String,
    },

    /// A success response whose body could not be interpreted.
    #[error("malformed governance response: {details}")]
    InvalidResponse {
        /// Description of the parse failure
        details: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {details}")]
    ClientBuild {
        /// Description of the build failure
        details: String,
    },
}

impl GateError {
    /// True for connection-level failures, as opposed to answers the
    /// service actually produced.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Timeout { .. })
    }
}
