use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::models::usuario::Rol;

// Alta de empresa desde el back-office
#[derive(Debug, Deserialize, Validate)]
pub struct CrearEmpresaRequest {
    #[validate(length(min = 2, max = 255))]
    pub nombre: String,

    #[validate(custom = "crate::utils::validation::validate_rut")]
    pub rut: String,

    #[validate(custom = "crate::utils::validation::validate_pin")]
    pub pin: Option<String>,

    #[validate(length(max = 255))]
    pub giro: Option<String>,

    #[validate(length(max = 500))]
    pub direccion: Option<String>,

    #[validate(length(max = 255))]
    pub contacto_nombre: Option<String>,

    #[validate(email)]
    pub contacto_email: Option<String>,

    #[validate(length(max = 30))]
    pub contacto_telefono: Option<String>,

    #[serde(default)]
    pub prioridad_alta: bool,

    #[serde(default)]
    pub inspeccion_mensual: bool,
}

// Actualización parcial de empresa
#[derive(Debug, Deserialize, Validate)]
pub struct ActualizarEmpresaRequest {
    #[validate(length(min = 2, max = 255))]
    pub nombre: Option<String>,

    #[validate(length(max = 255))]
    pub giro: Option<String>,

    #[validate(length(max = 500))]
    pub direccion: Option<String>,

    #[validate(length(max = 255))]
    pub contacto_nombre: Option<String>,

    #[validate(email)]
    pub contacto_email: Option<String>,

    #[validate(length(max = 30))]
    pub contacto_telefono: Option<String>,

    pub prioridad_alta: Option<bool>,
    pub inspeccion_mensual: Option<bool>,
    pub activa: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmpresaFilters {
    pub busqueda: Option<String>,
    pub incluir_inactivas: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct EmpresaCreadaResponse {
    pub empresa: crate::models::empresa::EmpresaResponse,
    /// PIN generado; solo se muestra una vez
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PinReseteadoResponse {
    pub empresa_id: uuid::Uuid,
    pub pin: String,
}

// Alta de usuario staff
#[derive(Debug, Deserialize, Validate)]
pub struct CrearUsuarioRequest {
    #[validate(length(min = 2, max = 100))]
    pub nombre: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 100))]
    pub password: String,

    pub rol: Rol,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActualizarUsuarioRequest {
    #[validate(length(min = 2, max = 100))]
    pub nombre: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 100))]
    pub password: Option<String>,

    pub rol: Option<Rol>,
    pub activo: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UsuarioFilters {
    pub rol: Option<Rol>,
    pub incluir_inactivos: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CamionFilters {
    pub empresa_id: Option<uuid::Uuid>,
    pub patente: Option<String>,
}

// Resumen para el dashboard
#[derive(Debug, Serialize)]
pub struct ResumenResponse {
    pub por_estado: BTreeMap<String, i64>,
    pub por_resultado: BTreeMap<String, i64>,
    pub empresas_activas: i64,
    pub camiones_activos: i64,
    pub puntaje_promedio: Option<f64>,
}
