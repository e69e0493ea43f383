// lodge-client/src/http/network.rs
// 网络 HTTP 客户端 - reqwest

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{ApiReply, ApiRequest, HttpClient, parse_body};
use crate::session::Session;
use crate::{ClientConfig, ClientError, ClientResult};

/// 网络 HTTP 客户端
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, session: Arc<Session>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn execute(&self, request: ApiRequest) -> ClientResult<ApiReply> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = %request.method, url = %url, "HTTP request");

        let mut req = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(auth) = self.session.bearer() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!(method = %request.method, url = %url, error = %e, "HTTP transport failure");
            ClientError::from(e)
        })?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        Ok(ApiReply {
            status,
            body: parse_body(&bytes),
        })
    }

    fn session(&self) -> &Session {
        &self.session
    }
}
