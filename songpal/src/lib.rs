//! Songpal Protocol Client
//!
//! Implements the subset of Sony's JSON-RPC "songpal" HTTP API needed to drive
//! the lighting of an LSPX-S2: misc device settings plus the system and
//! interface information used to identify the device.

mod client;
mod config;
mod error;
pub mod protocol;
mod source;

pub use client::*;
pub use config::*;
pub use error::*;
pub use protocol::{
    InterfaceInformation, Setting, SettingChange, SettingOption, SettingTarget, SystemInfo,
};
pub use source::*;

/// Model this crate is written against
pub const DEFAULT_MODEL: &str = "LSPX-S2";

/// Manufacturer reported for every device
pub const MANUFACTURER: &str = "Sony";
