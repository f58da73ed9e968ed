//! Modelo de Camión y Proveedor
//!
//! Un proveedor vincula una empresa con su flota; cada camión pertenece
//! a un proveedor.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Proveedor - mapea a la tabla proveedores
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Proveedor {
    pub id: Uuid,
    pub empresa_id: Uuid,
    pub nombre: String,
    pub created_at: DateTime<Utc>,
}

/// Camión - mapea a la tabla camiones
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Camion {
    pub id: Uuid,
    pub proveedor_id: Uuid,
    pub patente: String,
    pub marca: String,
    pub modelo: String,
    pub anio: Option<i32>,
    pub carroceria: Option<String>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}

/// Camión con su empresa, para vistas de administración
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CamionConEmpresa {
    pub id: Uuid,
    pub patente: String,
    pub marca: String,
    pub modelo: String,
    pub anio: Option<i32>,
    pub carroceria: Option<String>,
    pub activo: bool,
    pub empresa_id: Uuid,
    pub empresa_nombre: String,
}

/// Datos validados de un camión a registrar
#[derive(Debug, Clone)]
pub struct NuevoCamion {
    pub patente: String,
    pub marca: String,
    pub modelo: String,
    pub anio: Option<i32>,
    pub carroceria: Option<String>,
}
