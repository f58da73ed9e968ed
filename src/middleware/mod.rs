//! Middleware del sistema
//!
//! Extractores de sesión, CORS y rate limiting de los endpoints de login.

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::*;
pub use cors::*;
pub use rate_limit::*;
