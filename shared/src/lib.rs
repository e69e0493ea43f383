//! Shared types for the lodge back office
//!
//! Pure logic used by the HTTP client and the admin CLI: error codes,
//! wire models, form validation, the admin module registry, response
//! envelope parsing, the submission guard, pricing and CSV export.

pub mod error;
pub mod export;
pub mod models;
pub mod pricing;
pub mod registry;
pub mod request;
pub mod response;
pub mod submission;
pub mod util;
pub mod validation;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use registry::{ModuleDescriptor, find_module};
pub use response::{ShapeError, normalize_list};
pub use submission::{SubmitGuard, SubmitState};
pub use validation::FieldErrors;
