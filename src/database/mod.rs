//! Módulo de base de datos
//!
//! Maneja la conexión y operaciones con PostgreSQL

pub mod connection;

pub use connection::DatabaseConnection;

/// Código SQLSTATE de violación de unicidad en PostgreSQL
pub const UNIQUE_VIOLATION: &str = "23505";

/// Verificar si un error de sqlx es una violación de restricción única
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}
