//! Login session and token storage
//!
//! The session owns the bearer token and announces every change through a
//! `tokio::sync::watch` channel, so views react to login/logout instead of
//! polling storage. Where the token lives is up to the [`TokenStore`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{ClientError, ClientResult};

/// Persistence for the bearer token
pub trait TokenStore: Send + Sync + fmt::Debug {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> std::io::Result<()>;
    fn clear(&self) -> std::io::Result<()>;
}

/// Token kept in process memory only
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        *self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        *self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

/// 凭证文件内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    /// Epoch millis of the last save
    pub saved_at: i64,
}

/// 凭证存储 - JSON 文件
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 获取路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full file content, including the save time
    pub fn load_entry(&self) -> Option<StoredToken> {
        let json = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&json).ok()
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        self.load_entry()
            .map(|entry| entry.token)
            .filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        self.ensure_dir()?;
        let entry = StoredToken {
            token: token.to_string(),
            saved_at: shared::util::now_millis(),
        };
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(&self.path, json)
    }

    fn clear(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Current login state
#[derive(Debug)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    tx: watch::Sender<Option<String>>,
}

impl Session {
    /// Start from whatever the store already holds
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (tx, _rx) = watch::channel(store.load());
        Self { store, tx }
    }

    /// Anonymous session with an in-memory store
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self::new(Arc::new(MemoryTokenStore::new())))
    }

    pub fn token(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// `Authorization` header value, only when logged in
    pub fn bearer(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|t| format!("Bearer {t}"))
    }

    /// Store a new token and notify subscribers
    pub fn set_token(&self, token: impl Into<String>) -> ClientResult<()> {
        let token = token.into();
        self.store
            .save(&token)
            .map_err(|e| ClientError::Internal(format!("Failed to save token: {e}")))?;
        self.publish(Some(token));
        Ok(())
    }

    /// Drop the token (logout, or an admin call rejected with 401/403)
    pub fn clear(&self) -> ClientResult<()> {
        self.store
            .clear()
            .map_err(|e| ClientError::Internal(format!("Failed to clear token: {e}")))?;
        if self.publish(None) {
            tracing::info!("Session cleared");
        }
        Ok(())
    }

    /// Receiver notified on every token change
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }

    /// Re-read the store (written by another process). Returns whether the
    /// token changed; subscribers are only notified in that case.
    pub fn reload(&self) -> bool {
        let changed = self.publish(self.store.load());
        if changed {
            tracing::debug!(logged_in = self.is_logged_in(), "Session reloaded from store");
        }
        changed
    }

    /// Admin endpoints: a 401/403 ends the session. The token is cleared
    /// and the error becomes [`ClientError::SessionExpired`]; any other
    /// error passes through.
    pub fn expire_on_auth_failure(&self, err: ClientError) -> ClientError {
        if !err.is_auth_failure() {
            return err;
        }
        tracing::warn!(error = %err, "Admin request rejected, clearing session");
        if let Err(clear_err) = self.clear() {
            tracing::error!(error = %clear_err, "Failed to clear session");
        }
        ClientError::session_expired()
    }

    fn publish(&self, token: Option<String>) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == token {
                return false;
            }
            *current = token;
            true
        })
    }
}
