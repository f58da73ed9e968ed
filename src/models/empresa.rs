//! Modelo de Empresa
//!
//! Empresa cliente dueña de una flota. Mapea a la tabla `empresas`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Empresa - mapea exactamente a la tabla empresas
#[derive(Debug, Clone, FromRow)]
pub struct Empresa {
    pub id: Uuid,
    pub nombre: String,
    pub rut: String,
    pub giro: Option<String>,
    pub direccion: Option<String>,
    pub contacto_nombre: Option<String>,
    pub contacto_email: Option<String>,
    pub contacto_telefono: Option<String>,
    pub pin_hash: String,
    pub prioridad_alta: bool,
    pub inspeccion_mensual: bool,
    pub activa: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para insertar una empresa nueva
#[derive(Debug, Clone)]
pub struct NuevaEmpresa {
    pub nombre: String,
    pub rut: String,
    pub giro: Option<String>,
    pub direccion: Option<String>,
    pub contacto_nombre: Option<String>,
    pub contacto_email: Option<String>,
    pub contacto_telefono: Option<String>,
    pub pin_hash: String,
    pub prioridad_alta: bool,
    pub inspeccion_mensual: bool,
}

/// Response de empresa (sin PIN)
#[derive(Debug, Clone, Serialize)]
pub struct EmpresaResponse {
    pub id: Uuid,
    pub nombre: String,
    pub rut: String,
    pub giro: Option<String>,
    pub direccion: Option<String>,
    pub contacto_nombre: Option<String>,
    pub contacto_email: Option<String>,
    pub contacto_telefono: Option<String>,
    pub prioridad_alta: bool,
    pub inspeccion_mensual: bool,
    pub activa: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Empresa> for EmpresaResponse {
    fn from(empresa: Empresa) -> Self {
        Self {
            id: empresa.id,
            nombre: empresa.nombre,
            rut: empresa.rut,
            giro: empresa.giro,
            direccion: empresa.direccion,
            contacto_nombre: empresa.contacto_nombre,
            contacto_email: empresa.contacto_email,
            contacto_telefono: empresa.contacto_telefono,
            prioridad_alta: empresa.prioridad_alta,
            inspeccion_mensual: empresa.inspeccion_mensual,
            activa: empresa.activa,
            created_at: empresa.created_at,
        }
    }
}
