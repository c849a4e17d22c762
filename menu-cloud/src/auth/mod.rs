//! Authentication and authorization

pub mod context;
pub mod middleware;
pub mod otp;
pub mod rate_limit;
pub mod token;

pub use context::{AuthContext, Scope};
pub use otp::Otp;
pub use token::{Claims, TokenService};
