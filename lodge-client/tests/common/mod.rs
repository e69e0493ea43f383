// lodge-client/tests/common/mod.rs
// 测试用假后端: 记录所有请求, 按 "METHOD path" 返回预设响应

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use lodge_client::{HttpClient, OneshotHttpClient, Session};
use serde_json::{Value, json};
use shared::error::{ApiResponse, AppError};

/// One request as the backend saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Json(u16, Value),
    Text(u16, String),
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    log: Arc<Mutex<Vec<Recorded>>>,
    routes: Arc<Mutex<HashMap<String, Scripted>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(method: &str, path: &str) -> String {
        format!("{} {}", method.to_ascii_uppercase(), path)
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(Self::key(method, path), Scripted::Json(status, body));
        self
    }

    pub fn respond_text(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(Self::key(method, path), Scripted::Text(status, body.to_string()));
        self
    }

    /// Answer with the shared error envelope, as the real API does
    pub fn respond_error(&self, method: &str, path: &str, err: AppError) -> &Self {
        let status = err.http_status().as_u16();
        let body = serde_json::to_value(ApiResponse::<()>::error(&err)).unwrap();
        self.respond(method, path, status, body)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn router(&self) -> Router {
        Router::new().fallback(handle).with_state(self.clone())
    }

    pub fn client(&self, session: Arc<Session>) -> Arc<dyn HttpClient> {
        Arc::new(OneshotHttpClient::new(self.router(), session))
    }
}

async fn handle(State(backend): State<FakeBackend>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let recorded = Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts
            .headers
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect(),
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    };
    let key = FakeBackend::key(&recorded.method, &recorded.path);
    backend.log.lock().unwrap().push(recorded);

    let scripted = backend.routes.lock().unwrap().get(&key).cloned();
    match scripted {
        Some(Scripted::Json(status, body)) => {
            let status = StatusCode::from_u16(status).unwrap();
            if body.is_null() {
                status.into_response()
            } else {
                (status, axum::Json(body)).into_response()
            }
        }
        Some(Scripted::Text(status, text)) => {
            (StatusCode::from_u16(status).unwrap(), text).into_response()
        }
        None => (StatusCode::NOT_FOUND, axum::Json(json!({ "message": "Not found" }))).into_response(),
    }
}
