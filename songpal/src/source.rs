//! Settings source trait
//!
//! This module defines the interface the lighting layer talks to. Two
//! implementations exist: [`LiveDeviceSource`] speaks HTTP to a real device
//! and [`FakeDeviceSource`] keeps an in-memory device for tests and demos.
//! Which one is used is decided by [`DeviceConfig::source`], never by
//! probing at runtime.

use crate::{
    DeviceClient, DeviceConfig, InterfaceInformation, Setting, SettingChange, SettingTarget,
    SongpalError, SongpalResult, SourceKind, SystemInfo,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// What a source can do, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// `getDeviceMiscSettings` / `setDeviceMiscSettings` are available
    pub misc_settings: bool,
    /// `getSystemInformation` is available
    pub system_info: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities {
        misc_settings: true,
        system_info: true,
    };
}

/// Device operations needed by the lighting layer
#[async_trait]
pub trait SettingsSource: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    /// Read all misc settings, in device order
    async fn get_misc_settings(&self) -> SongpalResult<Vec<Setting>>;

    /// Write the given changes in one request
    async fn set_misc_settings(&self, changes: &[SettingChange]) -> SongpalResult<()>;

    async fn system_info(&self) -> SongpalResult<SystemInfo>;

    async fn interface_information(&self) -> SongpalResult<InterfaceInformation>;
}

/// Shared settings source handle
pub type SharedSettingsSource = Arc<dyn SettingsSource>;

/// Build the source selected by `config`
pub fn build_source(config: &DeviceConfig) -> SongpalResult<SharedSettingsSource> {
    config.validate()?;
    let source: SharedSettingsSource = match config.source {
        SourceKind::Live => Arc::new(LiveDeviceSource::from_config(config)?),
        SourceKind::Fake => Arc::new(FakeDeviceSource::new()),
    };
    Ok(source)
}

/// Source backed by a real device over HTTP
#[derive(Debug, Clone)]
pub struct LiveDeviceSource {
    client: DeviceClient,
}

impl LiveDeviceSource {
    pub fn new(client: DeviceClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &DeviceConfig) -> SongpalResult<Self> {
        Ok(Self::new(DeviceClient::with_config(
            &config.endpoint,
            config.timeouts.clone(),
        )?))
    }

    pub fn client(&self) -> &DeviceClient {
        &self.client
    }
}

#[async_trait]
impl SettingsSource for LiveDeviceSource {
    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    async fn get_misc_settings(&self) -> SongpalResult<Vec<Setting>> {
        self.client.get_device_misc_settings().await
    }

    async fn set_misc_settings(&self, changes: &[SettingChange]) -> SongpalResult<()> {
        self.client.set_device_misc_settings(changes).await
    }

    async fn system_info(&self) -> SongpalResult<SystemInfo> {
        self.client.get_system_info().await
    }

    async fn interface_information(&self) -> SongpalResult<InterfaceInformation> {
        self.client.get_interface_information().await
    }
}

/// Failure a [`FakeDeviceSource`] injects into every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeFailure {
    Timeout,
    Status(u16),
    MalformedBody,
}

impl FakeFailure {
    fn to_error(self, operation: &str) -> SongpalError {
        match self {
            FakeFailure::Timeout => SongpalError::timeout(operation, 0),
            FakeFailure::Status(status) => SongpalError::HttpError {
                status,
                message: "injected failure".to_string(),
            },
            FakeFailure::MalformedBody => {
                SongpalError::ParseError("injected malformed body".to_string())
            }
        }
    }
}

#[derive(Debug)]
struct FakeDevice {
    settings: Vec<Setting>,
    system_info: SystemInfo,
    interface: InterfaceInformation,
    failure: Option<FakeFailure>,
    applied: Vec<Vec<SettingChange>>,
}

/// In-memory device with the LSPX-S2 defaults
#[derive(Debug)]
pub struct FakeDeviceSource {
    device: Mutex<FakeDevice>,
    capabilities: Capabilities,
}

impl Default for FakeDeviceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDeviceSource {
    pub fn new() -> Self {
        Self::with_settings(vec![
            Setting::new(SettingTarget::LightingOnOff.as_str(), "on"),
            Setting::new(SettingTarget::LightingBrightness.as_str(), "20"),
            Setting::new(SettingTarget::LedFluctuationAdjustment.as_str(), "off"),
        ])
    }

    pub fn with_settings(settings: Vec<Setting>) -> Self {
        Self {
            device: Mutex::new(FakeDevice {
                settings,
                system_info: SystemInfo::default(),
                interface: InterfaceInformation {
                    model_name: Some(crate::DEFAULT_MODEL.to_string()),
                    ..Default::default()
                },
                failure: None,
                applied: Vec::new(),
            }),
            capabilities: Capabilities::ALL,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_system_info(self, info: SystemInfo) -> Self {
        self.lock().system_info = info;
        self
    }

    fn lock(&self) -> MutexGuard<'_, FakeDevice> {
        self.device.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every following call fail, or clear with `None`
    pub fn set_failure(&self, failure: Option<FakeFailure>) {
        self.lock().failure = failure;
    }

    /// Overwrite (or append) a setting as if changed on the device itself
    pub fn set_value(&self, target: &str, value: impl Into<String>) {
        let value = value.into();
        let mut device = self.lock();
        match device.settings.iter_mut().find(|s| s.target == target) {
            Some(setting) => setting.current_value = value,
            None => device.settings.push(Setting::new(target, value)),
        }
    }

    pub fn value(&self, target: &str) -> Option<String> {
        self.lock()
            .settings
            .iter()
            .find(|s| s.target == target)
            .map(|s| s.current_value.clone())
    }

    /// Every change list received by `set_misc_settings`, oldest first
    pub fn applied(&self) -> Vec<Vec<SettingChange>> {
        self.lock().applied.clone()
    }

    fn check(&self, operation: &str) -> SongpalResult<()> {
        match self.lock().failure {
            Some(failure) => Err(failure.to_error(operation)),
            None => Ok(()),
        }
    }

    fn require_misc(&self) -> SongpalResult<()> {
        if self.capabilities.misc_settings {
            Ok(())
        } else {
            Err(SongpalError::Unsupported("device misc settings".to_string()))
        }
    }
}

#[async_trait]
impl SettingsSource for FakeDeviceSource {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    async fn get_misc_settings(&self) -> SongpalResult<Vec<Setting>> {
        self.require_misc()?;
        self.check(crate::protocol::METHOD_GET_MISC_SETTINGS)?;
        Ok(self.lock().settings.clone())
    }

    async fn set_misc_settings(&self, changes: &[SettingChange]) -> SongpalResult<()> {
        self.require_misc()?;
        self.check(crate::protocol::METHOD_SET_MISC_SETTINGS)?;
        tracing::debug!("[FAKE] Applying {} setting change(s)", changes.len());
        for change in changes {
            self.set_value(&change.target, change.value.clone());
        }
        self.lock().applied.push(changes.to_vec());
        Ok(())
    }

    async fn system_info(&self) -> SongpalResult<SystemInfo> {
        if !self.capabilities.system_info {
            return Err(SongpalError::Unsupported("system information".to_string()));
        }
        self.check(crate::protocol::METHOD_GET_SYSTEM_INFO)?;
        Ok(self.lock().system_info.clone())
    }

    async fn interface_information(&self) -> SongpalResult<InterfaceInformation> {
        self.check(crate::protocol::METHOD_GET_INTERFACE_INFO)?;
        Ok(self.lock().interface.clone())
    }
}
