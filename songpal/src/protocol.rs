//! Sony JSON-RPC envelope and payload types
//!
//! Every call is a POST of `{"method", "params", "id", "version"}` to
//! `<endpoint>/sony/<service>`. A successful reply carries a `result` array,
//! a failed one an `error` array of `[code, message]`.

use crate::{SongpalError, SongpalResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Protocol version sent with every request
pub const JSON_RPC_VERSION: &str = "1.0";

/// Request id; the device echoes it but requests are never pipelined
pub const REQUEST_ID: u32 = 1;

pub const METHOD_GET_MISC_SETTINGS: &str = "getDeviceMiscSettings";
pub const METHOD_SET_MISC_SETTINGS: &str = "setDeviceMiscSettings";
pub const METHOD_GET_SYSTEM_INFO: &str = "getSystemInformation";
pub const METHOD_GET_INTERFACE_INFO: &str = "getInterfaceInformation";

pub const VALUE_ON: &str = "on";
pub const VALUE_OFF: &str = "off";

/// JSON-RPC request envelope
#[derive(Debug, Clone, Serialize)]
pub struct Request<'a> {
    pub method: &'a str,
    pub params: Value,
    pub id: u32,
    pub version: &'a str,
}

impl<'a> Request<'a> {
    pub fn new(method: &'a str, params: Value) -> Self {
        Self {
            method,
            params,
            id: REQUEST_ID,
            version: JSON_RPC_VERSION,
        }
    }

    pub fn get_device_misc_settings() -> Self {
        Self::new(METHOD_GET_MISC_SETTINGS, json!([{ "target": "" }]))
    }

    pub fn set_device_misc_settings(changes: &[SettingChange]) -> Self {
        Self::new(METHOD_SET_MISC_SETTINGS, json!([{ "settings": changes }]))
    }

    pub fn get_system_information() -> Self {
        Self::new(METHOD_GET_SYSTEM_INFO, json!([]))
    }

    pub fn get_interface_information() -> Self {
        Self::new(METHOD_GET_INTERFACE_INFO, json!([]))
    }
}

/// JSON-RPC response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub result: Option<Vec<Value>>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub id: Option<u32>,
}

impl Response {
    /// Unwrap the `result` array, turning an `error` member into [`SongpalError::DeviceError`]
    pub fn into_result(self) -> SongpalResult<Vec<Value>> {
        if let Some(error) = self.error {
            return Err(device_error(&error));
        }
        self.result
            .ok_or_else(|| SongpalError::ParseError("response has neither result nor error".to_string()))
    }
}

fn device_error(error: &Value) -> SongpalError {
    let code = error
        .get(0)
        .and_then(Value::as_i64)
        .and_then(|c| i32::try_from(c).ok())
        .unwrap_or(-1);
    let message = error
        .get(1)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    SongpalError::DeviceError { code, message }
}

/// Misc setting targets this crate understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingTarget {
    LightingOnOff,
    LightingBrightness,
    /// Candle (flicker) mode
    LedFluctuationAdjustment,
}

impl SettingTarget {
    pub const ALL: [SettingTarget; 3] = [
        SettingTarget::LightingOnOff,
        SettingTarget::LightingBrightness,
        SettingTarget::LedFluctuationAdjustment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingTarget::LightingOnOff => "lightingOnOff",
            SettingTarget::LightingBrightness => "lightingBrightness",
            SettingTarget::LedFluctuationAdjustment => "ledFluctuationAdjustment",
        }
    }

    /// Look up a wire name; unknown targets yield `None`
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "lightingOnOff" => Some(SettingTarget::LightingOnOff),
            "lightingBrightness" => Some(SettingTarget::LightingBrightness),
            "ledFluctuationAdjustment" => Some(SettingTarget::LedFluctuationAdjustment),
            _ => None,
        }
    }
}

impl std::fmt::Display for SettingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One selectable value of a setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingOption {
    pub value: Value,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// A device setting as reported by `getDeviceMiscSettings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub target: String,
    #[serde(default)]
    pub current_value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidate: Vec<SettingOption>,
}

impl Setting {
    pub fn new(target: impl Into<String>, current_value: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            current_value: current_value.into(),
            candidate: Vec::new(),
        }
    }

    /// The known target, if any
    pub fn known_target(&self) -> Option<SettingTarget> {
        SettingTarget::from_name(&self.target)
    }
}

/// A single write sent with `setDeviceMiscSettings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingChange {
    pub target: String,
    pub value: String,
}

impl SettingChange {
    pub fn new(target: SettingTarget, value: impl Into<String>) -> Self {
        Self {
            target: target.as_str().to_string(),
            value: value.into(),
        }
    }
}

/// Reply of `getSystemInformation`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemInfo {
    pub mac_addr: Option<String>,
    pub wireless_mac_addr: Option<String>,
    pub version: Option<String>,
}

impl SystemInfo {
    /// Wired MAC first, wireless MAC otherwise
    pub fn hardware_id(&self) -> Option<&str> {
        self.mac_addr
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.wireless_mac_addr.as_deref().filter(|m| !m.is_empty()))
    }
}

/// Reply of `getInterfaceInformation`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterfaceInformation {
    pub model_name: Option<String>,
    pub product_name: Option<String>,
    pub product_category: Option<String>,
    pub interface_version: Option<String>,
    pub server_name: Option<String>,
}

/// Parse `result[0]` of a `getDeviceMiscSettings` reply
///
/// Items are read one at a time. An item without a string `target` or a
/// scalar `currentValue` is skipped, so a single odd setting never costs the
/// rest of the reply.
pub fn parse_misc_settings(result: Vec<Value>) -> SongpalResult<Vec<Setting>> {
    let first = result
        .into_iter()
        .next()
        .ok_or_else(|| SongpalError::ParseError("empty result array".to_string()))?;
    let items: Vec<Value> = serde_json::from_value(first)?;
    Ok(items.into_iter().filter_map(setting_from_value).collect())
}

fn setting_from_value(item: Value) -> Option<Setting> {
    let target = match item.get("target") {
        Some(Value::String(target)) => target.clone(),
        _ => {
            debug!("Skipping setting without a target: {}", item);
            return None;
        }
    };
    let current_value = match item.get("currentValue") {
        Some(Value::String(value)) => value.clone(),
        Some(Value::Number(value)) => value.to_string(),
        Some(Value::Bool(value)) => value.to_string(),
        _ => {
            debug!("Skipping {} without a usable currentValue", target);
            return None;
        }
    };
    let candidate = item
        .get("candidate")
        .and_then(|c| serde_json::from_value(c.clone()).ok())
        .unwrap_or_default();
    Some(Setting {
        target,
        current_value,
        candidate,
    })
}

/// Parse the first object of a result array into `T`
pub fn parse_first<T: for<'de> Deserialize<'de>>(result: Vec<Value>) -> SongpalResult<T> {
    let first = result
        .into_iter()
        .next()
        .ok_or_else(|| SongpalError::ParseError("empty result array".to_string()))?;
    Ok(serde_json::from_value(first)?)
}
