//! Client configuration
//!
//! # 环境变量
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | LODGE_API_URL | http://localhost:5000 | API 地址 |
//! | LODGE_API_TOKEN | - | 初始 Bearer token |
//! | LODGE_TIMEOUT_SECS | 30 | 请求超时(秒) |
//! | LOG_LEVEL | info | 日志级别 |
//! | LOG_DIR | - | 日志文件目录 (按天滚动) |
//! | LODGE_TOKEN_FILE | - | token 持久化文件 |

use std::path::PathBuf;
use std::sync::Arc;

use crate::http::NetworkHttpClient;
use crate::session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
use crate::ClientResult;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Client configuration for connecting to the lodge API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Bearer token for admin endpoints
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Log level (trace | debug | info | warn | error)
    pub log_level: String,

    /// Directory for rolling log files; console only when unset
    pub log_dir: Option<PathBuf>,

    /// File the session token is persisted to; in-memory when unset
    pub token_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
            token_file: None,
        }
    }

    /// 从环境变量加载配置 (先读取 `.env`)
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            base_url: std::env::var("LODGE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            token: std::env::var("LODGE_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            timeout: std::env::var("LODGE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into()),
            log_dir: std::env::var("LOG_DIR").ok().map(PathBuf::from),
            token_file: std::env::var("LODGE_TOKEN_FILE").ok().map(PathBuf::from),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    /// Session backed by the configured store. A configured token is saved
    /// into the store, replacing whatever it held.
    pub fn build_session(&self) -> ClientResult<Arc<Session>> {
        let store: Arc<dyn TokenStore> = match &self.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        let session = Arc::new(Session::new(store));
        if let Some(token) = &self.token {
            session.set_token(token.clone())?;
        }
        Ok(session)
    }

    /// Create a network HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::new(self, self.build_session()?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
