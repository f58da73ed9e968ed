//! Modelo de FotoInspeccion
//!
//! Evidencia fotográfica: URL del media host o bytes almacenados en línea.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Content types aceptados para fotos
pub const CONTENT_TYPES_PERMITIDOS: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Metadatos de una foto (sin los bytes)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FotoInspeccion {
    pub id: Uuid,
    pub inspeccion_id: Uuid,
    pub detalle_id: Option<Uuid>,
    pub url: Option<String>,
    pub public_id: Option<String>,
    pub content_type: String,
    pub tamano_bytes: i32,
    pub created_at: DateTime<Utc>,
}

/// Contenido de una foto para servirla
#[derive(Debug, Clone, FromRow)]
pub struct FotoContenido {
    pub id: Uuid,
    pub inspeccion_id: Uuid,
    pub url: Option<String>,
    pub datos: Option<Vec<u8>>,
    pub content_type: String,
}

/// Foto a insertar
#[derive(Debug, Clone)]
pub struct NuevaFoto {
    pub inspeccion_id: Uuid,
    pub detalle_id: Option<Uuid>,
    pub url: Option<String>,
    pub public_id: Option<String>,
    pub datos: Option<Vec<u8>>,
    pub content_type: String,
    pub tamano_bytes: i32,
}
