//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::ReservationNotFound | Self::PromotionNotFound => {
                StatusCode::NOT_FOUND
            }

            Self::AlreadyExists => StatusCode::CONFLICT,

            Self::DuplicateSubmission => StatusCode::TOO_MANY_REQUESTS,

            Self::NotAuthenticated | Self::TokenInvalid | Self::SessionExpired => {
                StatusCode::UNAUTHORIZED
            }

            Self::PermissionDenied => StatusCode::FORBIDDEN,

            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            Self::InternalError
            | Self::ConfigError
            | Self::UnexpectedResponseShape
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 for validation and business-rule failures
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
