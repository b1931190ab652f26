//! Device settings adapter
//!
//! Sits between the light and a [`SettingsSource`]. Reads never fail from the
//! caller's point of view: when the device cannot be reached the last known
//! values in [`FallbackState`] are used. Writes update that cache first and
//! are not rolled back when the device rejects them.

use crate::brightness;
use crate::state::{DeviceSettingsSnapshot, FallbackState};
use songpal::protocol::{VALUE_OFF, VALUE_ON};
use songpal::{
    build_source, Capabilities, DeviceConfig, SettingChange, SettingTarget, SharedSettingsSource,
    SongpalResult,
};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// One adapter per device endpoint
pub struct SettingsAdapter {
    source: SharedSettingsSource,
    fallback: Mutex<FallbackState>,
}

impl SettingsAdapter {
    pub fn new(source: SharedSettingsSource) -> Self {
        Self {
            source,
            fallback: Mutex::new(FallbackState::default()),
        }
    }

    /// Build the configured source and wrap it
    pub fn from_config(config: &DeviceConfig) -> SongpalResult<Self> {
        Ok(Self::new(build_source(config)?))
    }

    pub fn source(&self) -> &SharedSettingsSource {
        &self.source
    }

    pub fn capabilities(&self) -> Capabilities {
        self.source.capabilities()
    }

    // Never held across an await
    fn fallback(&self) -> MutexGuard<'_, FallbackState> {
        self.fallback.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the cached values
    pub fn fallback_state(&self) -> FallbackState {
        self.fallback().clone()
    }

    /// Snapshot of the cached values without contacting the device
    pub fn snapshot(&self) -> DeviceSettingsSnapshot {
        self.fallback().snapshot()
    }

    /// Read the device and merge its answer into the cache
    ///
    /// Unlike [`fetch`](Self::fetch) this reports whether the device answered.
    pub async fn refresh(&self) -> SongpalResult<DeviceSettingsSnapshot> {
        let settings = self.source.get_misc_settings().await?;
        let mut fallback = self.fallback();
        fallback.merge_settings(&settings);
        Ok(fallback.snapshot())
    }

    /// Current lighting state, from the device when reachable, cached otherwise
    pub async fn fetch(&self) -> DeviceSettingsSnapshot {
        match self.refresh().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!("Failed to get device misc settings, using cached state: {}", e);
                self.snapshot()
            }
        }
    }

    /// Write `changes` to the cache, then to the device in one request
    ///
    /// Returns false when the device did not confirm the write. The cache keeps
    /// the new values either way.
    pub async fn apply(&self, changes: Vec<SettingChange>) -> bool {
        self.fallback().apply_changes(&changes);

        match self.source.set_misc_settings(&changes).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to set device misc settings {:?}: {}", changes, e);
                false
            }
        }
    }

    /// Turn the lighting on, optionally at a normalized brightness
    pub async fn turn_on(&self, brightness: Option<u8>) -> bool {
        self.apply(turn_on_changes(brightness)).await
    }

    /// Turn the lighting and candle mode off
    pub async fn turn_off(&self) -> bool {
        self.apply(turn_off_changes()).await
    }
}

/// Changes issued for a turn-on request
///
/// An explicit brightness cancels candle mode.
pub fn turn_on_changes(brightness: Option<u8>) -> Vec<SettingChange> {
    match brightness {
        Some(level) => vec![
            SettingChange::new(
                SettingTarget::LightingBrightness,
                brightness::normalized_to_device(level).to_string(),
            ),
            SettingChange::new(SettingTarget::LedFluctuationAdjustment, VALUE_OFF),
        ],
        None => vec![SettingChange::new(SettingTarget::LightingOnOff, VALUE_ON)],
    }
}

/// Changes issued for a turn-off request
///
/// Candle mode alone reads as on, so it is cleared together with the lighting.
pub fn turn_off_changes() -> Vec<SettingChange> {
    vec![
        SettingChange::new(SettingTarget::LedFluctuationAdjustment, VALUE_OFF),
        SettingChange::new(SettingTarget::LightingOnOff, VALUE_OFF),
    ]
}
