//! Data models
//!
//! Shared between menu-cloud and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL).

pub mod account;
pub mod category;
pub mod item;
pub mod restaurant;

// Re-exports
pub use account::*;
pub use category::*;
pub use item::*;
pub use restaurant::*;
