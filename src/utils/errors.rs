//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::database::is_unique_violation;
use crate::models::inspeccion::EstadoInspeccion;
use crate::services::scoring_service::ScoringError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Transición inválida: {desde} -> {hacia}")]
    TransicionInvalida {
        desde: EstadoInspeccion,
        hacia: EstadoInspeccion,
    },

    #[error("Checklist incompleto: faltan {faltantes} ítems")]
    ChecklistIncompleto { faltantes: usize, items: Vec<String> },
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    ok: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            ok: false,
            error: error.into(),
            code,
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorResponse) {
        match self {
            AppError::Database(e) if is_unique_violation(&e) => (
                StatusCode::CONFLICT,
                ErrorResponse::new("El registro ya existe", "CONFLICT"),
            ),
            AppError::Database(e) => {
                tracing::error!(error = %e, "error de base de datos");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Error al acceder a la base de datos", "DB_ERROR"),
                )
            }
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Los datos enviados no son válidos", "VALIDATION_ERROR")
                    .with_details(json!(e)),
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new(msg, "UNAUTHORIZED"),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorResponse::new(msg, "FORBIDDEN")),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg, "NOT_FOUND")),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::new(msg, "CONFLICT")),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(msg, "BAD_REQUEST"))
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "error interno");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Ocurrió un error inesperado", "INTERNAL_ERROR"),
                )
            }
            AppError::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse::new(
                    "Demasiados intentos. Intente nuevamente más tarde",
                    "RATE_LIMIT_EXCEEDED",
                ),
            ),
            AppError::Jwt(msg) => (StatusCode::UNAUTHORIZED, ErrorResponse::new(msg, "JWT_ERROR")),
            AppError::Hash(msg) => {
                tracing::error!(error = %msg, "error de hash");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Error al procesar credenciales", "HASH_ERROR"),
                )
            }
            AppError::ExternalApi(msg) => {
                tracing::error!(error = %msg, "error del media host");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new(
                        "Error al comunicarse con el servicio de fotos",
                        "EXTERNAL_API_ERROR",
                    ),
                )
            }
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse::new(msg, "PAYLOAD_TOO_LARGE"),
            ),
            AppError::TransicionInvalida { desde, hacia } => (
                StatusCode::CONFLICT,
                ErrorResponse::new(
                    format!("La inspección está {} y no puede pasar a {}", desde, hacia),
                    "INVALID_TRANSITION",
                )
                .with_details(json!({ "desde": desde, "hacia": hacia })),
            ),
            AppError::ChecklistIncompleto { faltantes, items } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new(
                    format!("Faltan {} ítems del checklist por responder", faltantes),
                    "CHECKLIST_INCOMPLETO",
                )
                .with_details(json!({ "faltantes": faltantes, "items": items })),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), code = body.code, error = %body.error, "request rechazada");
        }
        (status, Json(body)).into_response()
    }
}

impl From<ScoringError> for AppError {
    fn from(error: ScoringError) -> Self {
        match error {
            ScoringError::Incompleto { faltantes, codigos } => AppError::ChecklistIncompleto {
                faltantes,
                items: codigos,
            },
            ScoringError::ItemDesconocido(codigo) => {
                AppError::BadRequest(format!("Ítem de checklist desconocido: {}", codigo))
            }
        }
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.into());

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} con id '{}' no encontrado", resource, id))
}
