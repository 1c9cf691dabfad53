//! Configuration resolution for the governance gate.
//!
//! The gate itself only ever sees a fully resolved [`GateConfig`]. The raw
//! shapes a host runtime can hand us (plugin-entry JSON under the preferred
//! or a legacy plugin id, flat objects, garbage) are collapsed here, with
//! environment variables as the last fallback before hard defaults.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Default governance service endpoint.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default per-attempt request deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default transport retry budget (extra attempts after the first).
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Preferred plugin id under which hosts nest our config entry.
pub const PLUGIN_ID: &str = "actiongate";

/// Legacy plugin id still accepted when extracting nested host config.
const LEGACY_PLUGIN_ID: &str = "governance";

// ============================================================================
// Raw configuration
// ============================================================================

/// Configuration exactly as a host may supply it, everything optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGateConfig {
    /// Governance service base URL
    pub base_url: Option<String>,
    /// Per-attempt request deadline in milliseconds
    pub timeout_ms: Option<u64>,
    /// Block actions when the service is unreachable
    pub fail_closed: Option<bool>,
    /// Fixed agent identity overriding whatever the host context carries
    pub agent_id_override: Option<String>,
    /// Bearer credential for the service
    pub api_key: Option<String>,
    /// Approval wait budget in milliseconds; 0 disables polling.
    /// Accepted as signed because hosts have been seen sending negatives.
    pub wait_for_approval_ms: Option<i64>,
    /// Dashboard link used in block messages
    pub dashboard_url: Option<String>,
    /// Transport retry budget
    pub max_retries: Option<u32>,
}

// ============================================================================
// Resolved configuration
// ============================================================================

/// Fully resolved configuration the gate runs with.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Governance service base URL, trailing slashes trimmed
    pub base_url: String,
    /// Per-attempt request deadline
    pub timeout: Duration,
    /// Block actions when the service is unreachable (fail-closed)
    pub fail_closed: bool,
    /// Fixed agent identity overriding the host context
    pub agent_id_override: Option<String>,
    /// Bearer credential for the service
    pub api_key: Option<String>,
    /// Approval wait budget; zero disables polling
    pub wait_for_approval: Duration,
    /// Dashboard link used in block messages
    pub dashboard_url: String,
    /// Transport retry budget
    pub max_retries: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::resolve(RawGateConfig::default())
    }
}

impl GateConfig {
    /// Resolve a raw configuration into a complete one.
    ///
    /// Fallback order per field: configured value, then environment
    /// variable where one exists, then the hard default.
    #[must_use]
    pub fn resolve(raw: RawGateConfig) -> Self {
        let base_url = raw
            .base_url
            .unwrap_or_else(default_base_url)
            .trim_end_matches('/')
            .to_string();
        let dashboard_url = derive_dashboard_url(raw.dashboard_url.as_deref(), &base_url);
        Self {
            timeout: Duration::from_millis(raw.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
            fail_closed: raw.fail_closed.unwrap_or(true),
            agent_id_override: raw.agent_id_override,
            api_key: raw.api_key.or_else(env_api_key),
            wait_for_approval: Duration::from_millis(
                raw.wait_for_approval_ms.unwrap_or(0).max(0) as u64
            ),
            max_retries: raw.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            base_url,
            dashboard_url,
        }
    }

    /// Resolve from whatever config value the host runtime hands over.
    ///
    /// Accepts the plugin-local config object directly, or a whole host
    /// config in which our entry is nested under `pluginConfig`,
    /// `config.plugins.entries.<id>.config` (preferred then legacy id),
    /// or `config`. Non-object candidates collapse to defaults.
    #[must_use]
    pub fn from_host_value(host: &Value) -> Self {
        let candidate = host
            .get("pluginConfig")
            .or_else(|| host.pointer(&plugin_entry_pointer(PLUGIN_ID)))
            .or_else(|| host.pointer(&plugin_entry_pointer(LEGACY_PLUGIN_ID)))
            .or_else(|| host.get("config"))
            .unwrap_or(host);
        let raw = if candidate.is_object() {
            serde_json::from_value(candidate.clone()).unwrap_or_default()
        } else {
            RawGateConfig::default()
        };
        Self::resolve(raw)
    }
}

fn plugin_entry_pointer(plugin_id: &str) -> String {
    format!("/config/plugins/entries/{plugin_id}/config")
}

// ============================================================================
// Environment fallbacks
// ============================================================================

/// Base URL from `ACTIONGATE_BASE_URL`, else the hard default.
#[must_use]
pub fn default_base_url() -> String {
    match std::env::var("ACTIONGATE_BASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

/// API key from `ACTIONGATE_API_KEY`, if set.
fn env_api_key() -> Option<String> {
    std::env::var("ACTIONGATE_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
}

/// Machine identity attached to every submitted action.
///
/// Hostname when the environment exposes one, `user@local` as a second
/// choice, `"unknown"` when neither is available.
#[must_use]
pub fn runtime_id() -> String {
    match std::env::var("HOSTNAME") {
        Ok(host) if !host.is_empty() => host,
        _ => match std::env::var("USER") {
            Ok(user) if !user.is_empty() => format!("{user}@local"),
            _ => "unknown".to_string(),
        },
    }
}

// ============================================================================
// Dashboard URL
// ============================================================================

/// Pick the dashboard link for block messages.
///
/// A configured value wins (trimmed of trailing slashes). Otherwise the
/// service base URL is reused, with a trailing `:8000` rewritten to `:3000`
/// where the dashboard conventionally listens.
fn derive_dashboard_url(configured: Option<&str>, base_url: &str) -> String {
    if let Some(url) = configured {
        let trimmed = url.trim().trim_end_matches('/');
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    if let Some(prefix) = base_url.strip_suffix(":8000") {
        return format!("{prefix}:3000");
    }
    base_url.to_string()
}
