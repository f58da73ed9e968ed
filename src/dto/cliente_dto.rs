use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::empresa::EmpresaResponse;

// Request para registrar una empresa en el portal cliente
#[derive(Debug, Deserialize, Validate)]
pub struct RegistroClienteRequest {
    #[validate(length(min = 2, max = 255))]
    pub nombre: String,

    #[validate(custom = "crate::utils::validation::validate_rut")]
    pub rut: String,

    #[validate(custom = "crate::utils::validation::validate_pin")]
    pub pin: String,

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
}

// Login de cliente con RUT + PIN
#[derive(Debug, Deserialize, Validate)]
pub struct LoginClienteRequest {
    #[validate(custom = "crate::utils::validation::validate_rut")]
    pub rut: String,

    #[validate(custom = "crate::utils::validation::validate_pin")]
    pub pin: String,
}

#[derive(Debug, Serialize)]
pub struct SesionClienteResponse {
    pub empresa: EmpresaResponse,
}
