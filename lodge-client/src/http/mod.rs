//! HTTP transport
//!
//! Services build an [`ApiRequest`] and get back an [`ApiReply`] whatever
//! the status; mapping statuses to errors is done by the caller through
//! [`ApiReply::into_result`], because list fetches and mutations treat
//! failures differently.

mod network;
mod oneshot;

use async_trait::async_trait;
use http::Method;
use serde::Serialize;
use serde_json::Value;

pub use network::NetworkHttpClient;
pub use oneshot::OneshotHttpClient;

use crate::session::Session;
use crate::{ClientError, ClientResult};

/// Header duplicating the body's `idempotencyKey`
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// One API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute API path, e.g. `/api/rooms`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_json<B: Serialize>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path plus percent-encoded query string
    pub fn uri(&self) -> ClientResult<String> {
        if self.query.is_empty() {
            return Ok(self.path.clone());
        }
        let url = reqwest::Url::parse_with_params(&format!("http://localhost{}", self.path), &self.query)
            .map_err(|e| ClientError::Internal(format!("Invalid request path {}: {e}", self.path)))?;
        Ok(format!("{}?{}", url.path(), url.query().unwrap_or_default()))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and parsed body of a completed call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    /// `Value::Null` when the body was empty or not JSON
    pub body: Value,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body of a 2xx reply that does not report `success: false`
    pub fn into_result(self) -> ClientResult<Value> {
        let message = shared::response::server_message(&self.body);
        if !self.is_success() {
            let message = message.unwrap_or_default();
            return Err(match self.status {
                401 => ClientError::Unauthorized(message),
                403 => ClientError::Forbidden(message),
                status => ClientError::Api { status, message },
            });
        }
        if shared::response::reports_failure(&self.body) {
            return Err(ClientError::Api {
                status: self.status,
                message: message.unwrap_or_default(),
            });
        }
        Ok(self.body)
    }
}

/// Parse a response body; empty or non-JSON text reads as `Value::Null`
pub fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}

/// HTTP 客户端 trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send one request. Only transport failures are errors; every status
    /// code comes back as an [`ApiReply`].
    async fn execute(&self, request: ApiRequest) -> ClientResult<ApiReply>;

    /// Session whose token is attached to every request
    fn session(&self) -> &Session;
}
