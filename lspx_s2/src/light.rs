//! LSPX-S2 light
//!
//! The state a host entity exposes for the projector lighting: on/off,
//! brightness, availability and the identity used to register the device.

use crate::adapter::SettingsAdapter;
use crate::DOMAIN;
use serde::Serialize;
use songpal::{
    build_source, DeviceConfig, SharedSettingsSource, SongpalResult, DEFAULT_MODEL, MANUFACTURER,
};
use tracing::{debug, error, info};

/// Registry information for the physical device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// `(domain, unique id)` pairs
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

/// Create the light for `config`
///
/// Returns `Ok(None)` when the device does not offer misc settings, in which
/// case there is nothing to control.
pub fn setup_light(config: &DeviceConfig) -> SongpalResult<Option<LspxLight>> {
    let source = build_source(config)?;
    Ok(light_for_source(config.display_name(), source))
}

/// Create a light on an already built source, if it supports misc settings
pub fn light_for_source(name: &str, source: SharedSettingsSource) -> Option<LspxLight> {
    if !source.capabilities().misc_settings {
        debug!("Device {} does not support device misc settings, skipping light", name);
        return None;
    }
    info!("Setting up LSPX-S2 light {}", name);
    Some(LspxLight::new(name, SettingsAdapter::new(source)))
}

pub struct LspxLight {
    name: String,
    adapter: SettingsAdapter,
    is_on: bool,
    brightness: u8,
    available: bool,
    unique_id: Option<String>,
    model: Option<String>,
}

impl LspxLight {
    pub fn new(name: impl Into<String>, adapter: SettingsAdapter) -> Self {
        Self {
            name: name.into(),
            adapter,
            is_on: false,
            brightness: 0,
            available: false,
            unique_id: None,
            model: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// 0-255
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Whether the last update reached the device
    pub fn available(&self) -> bool {
        self.available
    }

    /// MAC address of the device, once known
    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    pub fn adapter(&self) -> &SettingsAdapter {
        &self.adapter
    }

    pub fn device_info(&self) -> Option<DeviceInfo> {
        let unique_id = self.unique_id.as_ref()?;
        Some(DeviceInfo {
            identifiers: vec![(DOMAIN.to_string(), unique_id.clone())],
            name: self.name.clone(),
            manufacturer: MANUFACTURER.to_string(),
            model: self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Poll the device
    ///
    /// When the device is unreachable the light turns unavailable and shows the
    /// adapter's cached state.
    pub async fn update(&mut self) {
        let snapshot = match self.adapter.refresh().await {
            Ok(snapshot) => {
                self.available = true;
                if self.unique_id.is_none() {
                    self.resolve_identity().await;
                }
                snapshot
            }
            Err(e) => {
                debug!("Failed to get device misc settings: {}", e);
                self.available = false;
                self.adapter.snapshot()
            }
        };
        self.is_on = snapshot.is_on;
        self.brightness = snapshot.brightness;
    }

    async fn resolve_identity(&mut self) {
        let source = self.adapter.source().clone();
        if source.capabilities().system_info {
            match source.system_info().await {
                Ok(info) => self.unique_id = info.hardware_id().map(str::to_string),
                Err(e) => debug!("Failed to get system info: {}", e),
            }
        }
        if self.model.is_none() {
            if let Ok(iface) = source.interface_information().await {
                self.model = iface.model_name.filter(|m| !m.is_empty());
            }
        }
    }

    /// Turn on, optionally at a 0-255 brightness
    pub async fn turn_on(&mut self, brightness: Option<u8>) -> bool {
        if !self.adapter.turn_on(brightness).await {
            error!("Failed to turn on lighting for {}", self.name);
            return false;
        }
        self.is_on = true;
        if let Some(level) = brightness {
            self.brightness = level;
        }
        true
    }

    pub async fn turn_off(&mut self) -> bool {
        if !self.adapter.turn_off().await {
            error!("Failed to turn off lighting for {}", self.name);
            return false;
        }
        self.is_on = false;
        true
    }
}
