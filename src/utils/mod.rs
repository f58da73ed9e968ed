//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT, cookies y otras funcionalidades comunes.

pub mod cookies;
pub mod errors;
pub mod jwt;
pub mod validation;

pub use errors::{AppError, AppResult};
