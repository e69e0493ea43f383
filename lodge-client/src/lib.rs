//! Lodge Client - HTTP client for the lodge back-office API
//!
//! Typed services over the REST API: generic admin CRUD driven by the
//! module registry, reservation intake with idempotent submission, admin
//! reservation listing and analytics, and promotions.

pub mod config;
pub mod crud;
pub mod error;
pub mod http;
pub mod logger;
pub mod promotion;
pub mod reservation;
pub mod session;

pub use config::ClientConfig;
pub use crud::{CrudService, ListOutcome, ModuleView};
pub use error::{ClientError, ClientResult};
pub use http::{ApiReply, ApiRequest, HttpClient, NetworkHttpClient, OneshotHttpClient};
pub use promotion::PromotionService;
pub use reservation::{CreatedReservation, ReservationService};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};

// Re-export shared types for convenience
pub use shared::error::{AppError, ErrorCode};
pub use shared::validation::FieldErrors;
