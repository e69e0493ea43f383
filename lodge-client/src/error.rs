//! Client error types

use shared::error::{AppError, ErrorCode};
use shared::response::ShapeError;
use shared::submission::GuardRejection;
use shared::validation::FieldErrors;
use thiserror::Error;

/// Where the UI goes after the session is dropped
pub const LOGIN_REDIRECT: &str = "/login";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status, or a 2xx body carrying `success: false`
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Authentication required
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Admin call rejected with 401/403; the stored token has been cleared
    #[error("Session expired, redirect to {redirect}")]
    SessionExpired { redirect: String },

    /// Form rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    /// Submit suppressed by the duplicate-submission guard; nothing was sent
    #[error("Duplicate submission: {0}")]
    DuplicateSubmission(GuardRejection),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    pub fn session_expired() -> Self {
        Self::SessionExpired {
            redirect: LOGIN_REDIRECT.to_string(),
        }
    }

    /// 401/403 from the server
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Forbidden(_))
    }

    /// Text shown to the user: the server's own message when it sent one,
    /// otherwise `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api { message, .. } | Self::Unauthorized(message) | Self::Forbidden(message)
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            Self::Validation(errors) => errors.summary(),
            Self::DuplicateSubmission(rejection) => rejection.to_string(),
            Self::SessionExpired { .. } => "Your session has expired. Please log in again.".into(),
            _ => fallback.to_string(),
        }
    }

    /// Unified error code for logging and CLI exit reporting
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::Api { status: 404, .. } => ErrorCode::NotFound,
            Self::Api { status: 409, .. } => ErrorCode::AlreadyExists,
            Self::Api { status, .. } if *status >= 500 => ErrorCode::InternalError,
            Self::Api { .. } => ErrorCode::InvalidRequest,
            Self::Unauthorized(_) => ErrorCode::NotAuthenticated,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
            Self::SessionExpired { .. } => ErrorCode::SessionExpired,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::DuplicateSubmission(_) => ErrorCode::DuplicateSubmission,
            Self::InvalidResponse(_) => ErrorCode::UnexpectedResponseShape,
            Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<ShapeError> for ClientError {
    fn from(err: ShapeError) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

impl From<FieldErrors> for ClientError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<GuardRejection> for ClientError {
    fn from(rejection: GuardRejection) -> Self {
        Self::DuplicateSubmission(rejection)
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Validation(errors) => errors.into(),
            other => AppError::with_message(other.code(), other.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
