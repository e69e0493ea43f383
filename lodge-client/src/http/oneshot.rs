// lodge-client/src/http/oneshot.rs
// Oneshot HTTP 客户端 - 内存通信

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::Request;
use tower::ServiceExt;

use super::{ApiReply, ApiRequest, HttpClient, parse_body};
use crate::session::Session;
use crate::{ClientError, ClientResult};

/// Oneshot HTTP 客户端 (内存调用)
///
/// 使用 Tower Service 的 oneshot 模式直接调用 Router，
/// 适用于同进程嵌入和测试，零网络开销。
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use lodge_client::{OneshotHttpClient, Session};
///
/// let client = OneshotHttpClient::new(fake_backend(), Session::in_memory());
/// let reply = client.execute(ApiRequest::get("/api/rooms")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
    session: Arc<Session>,
}

impl OneshotHttpClient {
    /// # Arguments
    /// * `router` - 已初始化的 Axum Router (with_state 已调用)
    pub fn new(router: Router, session: Arc<Session>) -> Self {
        Self { router, session }
    }

    fn build_request(&self, request: &ApiRequest) -> ClientResult<Request<Body>> {
        let mut builder = Request::builder()
            .method(request.method.clone())
            .uri(request.uri()?);

        if let Some(auth) = self.session.bearer() {
            builder = builder.header(http::header::AUTHORIZATION, auth);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = match &request.body {
            Some(value) => {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(value)?)
            }
            None => Body::empty(),
        };

        builder
            .body(body)
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {e}")))
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    async fn execute(&self, request: ApiRequest) -> ClientResult<ApiReply> {
        tracing::debug!(method = %request.method, path = %request.path, "Oneshot request");
        let http_request = self.build_request(&request)?;

        let response = self
            .router
            .clone()
            .oneshot(http_request)
            .await
            .map_err(|e| ClientError::Internal(format!("Oneshot call failed: {e}")))?;

        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Internal(format!("Failed to read body: {e}")))?;

        Ok(ApiReply {
            status,
            body: parse_body(&bytes),
        })
    }

    fn session(&self) -> &Session {
        &self.session
    }
}
