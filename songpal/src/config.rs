//! Device configuration
//!
//! Mirrors the host's per-device mapping (`name`, `endpoint`) and adds the
//! knobs the host never exposed: the source selection and request timeouts.

use crate::{SongpalError, SongpalResult};
use serde::Deserialize;

/// Default request timeout for every JSON-RPC call
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2000;

/// Timeout configuration for device requests
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout, connect included
    pub request_ms: u64,
    /// Connection establishment timeout
    pub connect_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            connect_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

/// Which [`SettingsSource`](crate::SettingsSource) implementation to build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Real device over HTTP
    #[default]
    Live,
    /// In-memory device, no network
    Fake,
}

/// Configuration for one device endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub endpoint: String,
    #[serde(default)]
    pub source: SourceKind,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl DeviceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            name: None,
            endpoint: endpoint.into(),
            source: SourceKind::Live,
            timeouts: TimeoutConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Parse a host-provided mapping; unknown keys are ignored
    pub fn from_value(value: serde_json::Value) -> SongpalResult<Self> {
        let config: DeviceConfig = serde_json::from_value(value)
            .map_err(|e| SongpalError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SongpalResult<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(SongpalError::InvalidConfig("endpoint must not be empty".to_string()));
        }
        // The device only serves plain HTTP and the client is built without TLS
        if self.source == SourceKind::Live && !endpoint.starts_with("http://") {
            return Err(SongpalError::InvalidConfig(format!(
                "endpoint must be an http:// URL: {}",
                endpoint
            )));
        }
        if self.timeouts.request_ms == 0 {
            return Err(SongpalError::InvalidConfig("request timeout must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Name shown to users: the configured name, or the endpoint
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.endpoint)
    }
}
