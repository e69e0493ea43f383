//! Data models
//!
//! Wire shapes of the lodge API (camelCase, Mongo `_id` accepted as `id`)
//! and the draft types the admin and guest forms edit.

pub mod analytics;
pub mod promotion;
pub mod reservation;
pub mod room;

// Re-exports
pub use analytics::*;
pub use promotion::*;
pub use reservation::*;
pub use room::*;
