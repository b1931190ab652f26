//! Brightness scale conversion
//!
//! The device reports brightness as an integer 0-32; callers work in 0-255.

use tracing::warn;

/// Highest brightness the device accepts
pub const DEVICE_BRIGHTNESS_MAX: u8 = 32;

/// Highest normalized brightness
pub const NORMALIZED_BRIGHTNESS_MAX: u8 = 255;

/// Normalized brightness reported while candle mode is on: 1% of full, at least 1
pub const CANDLE_BRIGHTNESS: u8 = candle_brightness();

const fn candle_brightness() -> u8 {
    let one_percent = NORMALIZED_BRIGHTNESS_MAX as u32 / 100;
    if one_percent < 1 {
        1
    } else {
        one_percent as u8
    }
}

/// Device scale to normalized scale, truncating: `d * 255 / 32`
pub fn device_to_normalized(device: u8) -> u8 {
    let device = device.min(DEVICE_BRIGHTNESS_MAX) as u32;
    (device * NORMALIZED_BRIGHTNESS_MAX as u32 / DEVICE_BRIGHTNESS_MAX as u32) as u8
}

/// Normalized scale to device scale, rounded to nearest
///
/// `round(b * 32 / 255)` in integer arithmetic. Ties cannot occur because
/// 255 is odd.
pub fn normalized_to_device(normalized: u8) -> u8 {
    let max = NORMALIZED_BRIGHTNESS_MAX as u32;
    let scaled = 2 * normalized as u32 * DEVICE_BRIGHTNESS_MAX as u32 + max;
    (scaled / (2 * max)) as u8
}

/// Parse a device brightness string, clamping values above the device maximum
///
/// Returns `None` for anything that is not a non-negative integer.
pub fn parse_device_brightness(value: &str) -> Option<u8> {
    let parsed: u32 = value.trim().parse().ok()?;
    if parsed > DEVICE_BRIGHTNESS_MAX as u32 {
        warn!("Device brightness {} above {}, clamping", parsed, DEVICE_BRIGHTNESS_MAX);
        return Some(DEVICE_BRIGHTNESS_MAX);
    }
    Some(parsed as u8)
}
