//! Songpal HTTP Client

use crate::protocol::{self, Request, Response};
use crate::{
    InterfaceInformation, Setting, SettingChange, SongpalError, SongpalResult, SystemInfo,
    TimeoutConfig,
};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Path prefix of every Sony service
pub const SONY_PATH: &str = "/sony";

/// Service that carries the misc settings and system calls
pub const SYSTEM_SERVICE: &str = "system";

/// Strip a trailing `/` and `/sony` from a configured endpoint
pub fn normalize_endpoint(endpoint: &str) -> String {
    let mut base = endpoint.trim().trim_end_matches('/');
    if let Some(stripped) = base.strip_suffix(SONY_PATH) {
        base = stripped.trim_end_matches('/');
    }
    base.to_string()
}

/// Client for one device's JSON-RPC API
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http_client: Client,
    base_url: String,
    timeout_config: TimeoutConfig,
}

impl DeviceClient {
    /// Create a client with default timeouts
    pub fn new(endpoint: &str) -> SongpalResult<Self> {
        Self::with_config(endpoint, TimeoutConfig::default())
    }

    pub fn with_config(endpoint: &str, timeout_config: TimeoutConfig) -> SongpalResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_millis(timeout_config.request_ms))
            .connect_timeout(Duration::from_millis(timeout_config.connect_ms))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SongpalError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: normalize_endpoint(endpoint),
            timeout_config,
        })
    }

    pub fn builder(endpoint: impl Into<String>) -> DeviceClientBuilder {
        DeviceClientBuilder::new(endpoint)
    }

    /// Endpoint with any `/sony` suffix removed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_config(&self) -> &TimeoutConfig {
        &self.timeout_config
    }

    /// Build the URL for a service
    pub fn service_url(&self, service: &str) -> String {
        format!("{}{}/{}", self.base_url, SONY_PATH, service)
    }

    /// POST one request and return its `result` array
    pub async fn call(&self, service: &str, request: &Request<'_>) -> SongpalResult<Vec<Value>> {
        let url = self.service_url(service);
        debug!("POST {} method={}", url, request.method);

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SongpalError::timeout(request.method, self.timeout_config.request_ms)
                } else {
                    e.into()
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SongpalError::HttpError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                SongpalError::timeout(request.method, self.timeout_config.request_ms)
            } else {
                e.into()
            }
        })?;
        let rpc: Response = serde_json::from_slice(&body)?;
        rpc.into_result()
    }

    pub async fn get_device_misc_settings(&self) -> SongpalResult<Vec<Setting>> {
        let result = self
            .call(SYSTEM_SERVICE, &Request::get_device_misc_settings())
            .await?;
        protocol::parse_misc_settings(result)
    }

    pub async fn set_device_misc_settings(&self, changes: &[SettingChange]) -> SongpalResult<()> {
        self.call(SYSTEM_SERVICE, &Request::set_device_misc_settings(changes))
            .await?;
        Ok(())
    }

    pub async fn get_system_info(&self) -> SongpalResult<SystemInfo> {
        let result = self
            .call(SYSTEM_SERVICE, &Request::get_system_information())
            .await?;
        protocol::parse_first(result)
    }

    pub async fn get_interface_information(&self) -> SongpalResult<InterfaceInformation> {
        let result = self
            .call(SYSTEM_SERVICE, &Request::get_interface_information())
            .await?;
        protocol::parse_first(result)
    }
}

/// Builder for creating DeviceClient with custom configuration
pub struct DeviceClientBuilder {
    endpoint: String,
    timeout_config: TimeoutConfig,
}

impl DeviceClientBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_config: TimeoutConfig::default(),
        }
    }

    pub fn timeout_config(mut self, config: TimeoutConfig) -> Self {
        self.timeout_config = config;
        self
    }

    pub fn request_timeout(mut self, ms: u64) -> Self {
        self.timeout_config.request_ms = ms;
        self
    }

    pub fn connect_timeout(mut self, ms: u64) -> Self {
        self.timeout_config.connect_ms = ms;
        self
    }

    pub fn build(self) -> SongpalResult<DeviceClient> {
        DeviceClient::with_config(&self.endpoint, self.timeout_config)
    }
}
