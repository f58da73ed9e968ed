use serde::Deserialize;
use validator::Validate;

// Login de staff con email + contraseña
#[derive(Debug, Deserialize, Validate)]
pub struct LoginStaffRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub password: String,
}
