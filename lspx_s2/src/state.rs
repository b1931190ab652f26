//! Cached lighting settings and the snapshot derived from them

use crate::brightness::{self, CANDLE_BRIGHTNESS};
use serde::Serialize;
use songpal::protocol::{VALUE_OFF, VALUE_ON};
use songpal::{Setting, SettingChange, SettingTarget, SongpalError, SongpalResult};
use tracing::debug;

/// Lighting state as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceSettingsSnapshot {
    pub is_on: bool,
    /// 0-255
    pub brightness: u8,
}

/// Last known value of each lighting target
///
/// Holds exactly one value per [`SettingTarget`] at all times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackState {
    lighting_on_off: String,
    /// Device scale, 0-32
    lighting_brightness: u8,
    led_fluctuation: String,
}

impl Default for FallbackState {
    fn default() -> Self {
        Self {
            lighting_on_off: VALUE_ON.to_string(),
            lighting_brightness: 20,
            led_fluctuation: VALUE_OFF.to_string(),
        }
    }
}

impl FallbackState {
    /// Current value of `target` in its wire form
    pub fn value(&self, target: SettingTarget) -> String {
        match target {
            SettingTarget::LightingOnOff => self.lighting_on_off.clone(),
            SettingTarget::LightingBrightness => self.lighting_brightness.to_string(),
            SettingTarget::LedFluctuationAdjustment => self.led_fluctuation.clone(),
        }
    }

    pub fn device_brightness(&self) -> u8 {
        self.lighting_brightness
    }

    pub fn candle_mode(&self) -> bool {
        self.led_fluctuation == VALUE_ON
    }

    /// Store one value
    ///
    /// Returns `Ok(false)` for unknown targets. An unparseable brightness is an
    /// error and leaves the cached brightness as it was.
    pub fn set(&mut self, target: &str, value: &str) -> SongpalResult<bool> {
        match SettingTarget::from_name(target) {
            Some(SettingTarget::LightingOnOff) => self.lighting_on_off = value.to_string(),
            Some(SettingTarget::LightingBrightness) => {
                self.lighting_brightness = brightness::parse_device_brightness(value)
                    .ok_or_else(|| SongpalError::invalid_value(target, value))?;
            }
            Some(SettingTarget::LedFluctuationAdjustment) => {
                self.led_fluctuation = value.to_string()
            }
            None => return Ok(false),
        }
        Ok(true)
    }

    fn set_logged(&mut self, target: &str, value: &str) {
        if let Err(e) = self.set(target, value) {
            debug!("Keeping cached value: {}", e);
        }
    }

    /// Overwrite from a device reply, in order
    pub fn merge_settings(&mut self, settings: &[Setting]) {
        for setting in settings {
            self.set_logged(&setting.target, &setting.current_value);
        }
    }

    pub fn apply_changes(&mut self, changes: &[SettingChange]) {
        for change in changes {
            self.set_logged(&change.target, &change.value);
        }
    }

    pub fn snapshot(&self) -> DeviceSettingsSnapshot {
        let candle = self.candle_mode();
        let is_on = self.lighting_on_off == VALUE_ON || candle;
        let brightness = if candle {
            CANDLE_BRIGHTNESS
        } else {
            brightness::device_to_normalized(self.lighting_brightness)
        };
        DeviceSettingsSnapshot { is_on, brightness }
    }
}
