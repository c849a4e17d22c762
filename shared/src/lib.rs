//! Shared types for the Store Menu platform
//!
//! Error taxonomy, domain models and the account/menu state rules used by
//! the `menu-cloud` service.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
