use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::camion::Camion;

// Camión a registrar en la flota
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CamionRequest {
    #[validate(custom = "crate::utils::validation::validate_patente")]
    pub patente: String,

    #[validate(length(min = 1, max = 100))]
    pub marca: String,

    #[validate(length(min = 1, max = 100))]
    pub modelo: String,

    pub anio: Option<i32>,

    #[validate(length(max = 100))]
    pub carroceria: Option<String>,
}

// Registro de flota (uno o más camiones)
#[derive(Debug, Deserialize, Validate)]
pub struct RegistrarFlotaRequest {
    #[validate(length(min = 1, max = 200))]
    pub camiones: Vec<CamionRequest>,
}

#[derive(Debug, Serialize)]
pub struct RegistrarFlotaResponse {
    pub proveedor_id: uuid::Uuid,
    pub camiones: Vec<Camion>,
}
