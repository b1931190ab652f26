//! In-process device emulator serving `/sony/system` over real HTTP

#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the emulator answers the next requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Status(u16),
    Delay(Duration),
    Garbage,
}

#[derive(Debug)]
struct Inner {
    settings: Vec<(String, String)>,
    requests: Vec<Value>,
    mode: Mode,
}

#[derive(Debug, Clone)]
pub struct Emulator {
    inner: Arc<Mutex<Inner>>,
    pub endpoint: String,
}

impl Emulator {
    /// Start an emulator seeded with the given settings; `endpoint` ends in `/sony`
    pub async fn start(settings: &[(&str, &str)]) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let inner = Arc::new(Mutex::new(Inner {
            settings: settings
                .iter()
                .map(|(t, v)| (t.to_string(), v.to_string()))
                .collect(),
            requests: Vec::new(),
            mode: Mode::Normal,
        }));

        let router = Router::new()
            .route("/sony/system", post(handle))
            .with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            inner,
            endpoint: format!("http://{}/sony", addr),
        }
    }

    pub fn set_mode(&self, mode: Mode) {
        self.inner.lock().unwrap().mode = mode;
    }

    pub fn requests(&self) -> Vec<Value> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn value(&self, target: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .settings
            .iter()
            .find(|(t, _)| t == target)
            .map(|(_, v)| v.clone())
    }
}

async fn handle(State(inner): State<Arc<Mutex<Inner>>>, Json(request): Json<Value>) -> Response {
    let mode = {
        let mut inner = inner.lock().unwrap();
        inner.requests.push(request.clone());
        inner.mode
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

    let body = match request["method"].as_str().unwrap_or_default() {
        "getDeviceMiscSettings" => {
            let inner = inner.lock().unwrap();
            let items: Vec<Value> = inner
                .settings
                .iter()
                .map(|(t, v)| json!({"target": t, "currentValue": v}))
                .collect();
            json!({"result": [items], "id": request["id"]})
        }
        "setDeviceMiscSettings" => {
            let mut inner = inner.lock().unwrap();
            let changes = request["params"][0]["settings"].as_array().cloned().unwrap_or_default();
            for change in changes {
                let target = change["target"].as_str().unwrap_or_default().to_string();
                let value = change["value"].as_str().unwrap_or_default().to_string();
                match inner.settings.iter_mut().find(|(t, _)| *t == target) {
                    Some(entry) => entry.1 = value,
                    None => inner.settings.push((target, value)),
                }
            }
            json!({"result": [], "id": request["id"]})
        }
        "getSystemInformation" => json!({
            "result": [{"macAddr": "", "wirelessMacAddr": "ac:9b:0a:11:22:33", "version": "2.1.0"}],
            "id": request["id"]
        }),
        "getInterfaceInformation" => json!({
            "result": [{"modelName": "LSPX-S2", "productCategory": "speaker", "interfaceVersion": "4.0.0"}],
            "id": request["id"]
        }),
        _ => json!({"error": [12, "No Such Method"], "id": request["id"]}),
    };

    Json(body).into_response()
}
