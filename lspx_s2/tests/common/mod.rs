//! LSPX-S2 emulator for the lighting tests
//!
//! Settings are kept as raw JSON items so a test can serve anything a real
//! device might send, including values of the wrong type.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Status(u16),
    Delay(Duration),
    Garbage,
}

#[derive(Debug)]
struct Device {
    items: Vec<Value>,
    requests: Vec<Value>,
    mode: Mode,
}

#[derive(Debug, Clone)]
pub struct Emulator {
    device: Arc<Mutex<Device>>,
    pub endpoint: String,
}

impl Emulator {
    /// Start with string settings; `endpoint` ends in `/sony`
    pub async fn start(settings: &[(&str, &str)]) -> Self {
        let items = settings
            .iter()
            .map(|(t, v)| json!({"target": t, "currentValue": v}))
            .collect();
        Self::start_with_items(items).await
    }

    /// Start with the exact items `getDeviceMiscSettings` should return
    pub async fn start_with_items(items: Vec<Value>) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let device = Arc::new(Mutex::new(Device {
            items,
            requests: Vec::new(),
            mode: Mode::Normal,
        }));

        let router = Router::new()
            .route("/sony/system", post(handle))
            .with_state(device.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            device,
            endpoint: format!("http://{}/sony", addr),
        }
    }

    pub fn set_mode(&self, mode: Mode) {
        self.device.lock().unwrap().mode = mode;
    }

    pub fn requests(&self) -> Vec<Value> {
        self.device.lock().unwrap().requests.clone()
    }

    /// Current value of `target` if it is a string
    pub fn value(&self, target: &str) -> Option<String> {
        self.device
            .lock()
            .unwrap()
            .items
            .iter()
            .find(|item| item["target"] == target)
            .and_then(|item| item["currentValue"].as_str().map(str::to_string))
    }
}

async fn handle(State(device): State<Arc<Mutex<Device>>>, Json(request): Json<Value>) -> Response {
    let mode = {
        let mut device = device.lock().unwrap();
        device.requests.push(request.clone());
        device.mode
    };

    match mode {
        Mode::Normal => {}
        Mode::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap();
            return (status, "emulated failure").into_response();
        }
        Mode::Delay(delay) => tokio::time::sleep(delay).await,
        Mode::Garbage => return (StatusCode::OK, "<html>not json</html>").into_response(),
    }

    let id = request["id"].clone();
    let body = match request["method"].as_str().unwrap_or_default() {
        "getDeviceMiscSettings" => {
            let device = device.lock().unwrap();
            json!({"result": [device.items], "id": id})
        }
        "setDeviceMiscSettings" => {
            let mut device = device.lock().unwrap();
            let changes = request["params"][0]["settings"].as_array().cloned().unwrap_or_default();
            for change in changes {
                let target = change["target"].clone();
                let value = change["value"].clone();
                match device.items.iter_mut().find(|item| item["target"] == target) {
                    Some(item) => item["currentValue"] = value,
                    None => device.items.push(json!({"target": target, "currentValue": value})),
                }
            }
            json!({"result": [], "id": id})
        }
        "getSystemInformation" => json!({
            "result": [{"macAddr": "", "wirelessMacAddr": "ac:9b:0a:11:22:33", "version": "2.1.0"}],
            "id": id
        }),
        "getInterfaceInformation" => json!({
            "result": [{"modelName": "LSPX-S2", "productCategory": "speaker"}],
            "id": id
        }),
        _ => json!({"error": [12, "No Such Method"], "id": id}),
    };

    Json(body).into_response()
}
