//! Sony LSPX-S2 lighting control
//!
//! Maps the projector's lighting settings (on/off, 0-32 brightness and candle
//! mode) onto a plain on/off plus 0-255 brightness light. The device is
//! reached through a [`songpal::SettingsSource`]; [`SettingsAdapter`] keeps the
//! last known values so reads keep working while the device is unreachable.

mod adapter;
pub mod brightness;
mod light;
mod state;

pub use adapter::*;
pub use light::*;
pub use state::*;

/// Integration domain used in device identifiers
pub const DOMAIN: &str = "lspx_s2";
