//! Utilidades JWT
//!
//! Este módulo contiene los claims de cada tipo de sesión y funciones helper
//! para firmar y verificar tokens HS256.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::utils::errors::AppError;

/// Claims de la cookie `petran_cliente`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClienteClaims {
    pub sub: String, // empresa_id
    pub rut: String,
    pub nombre: String,
    pub exp: usize,
    pub iat: usize,
}

/// Claims de la cookie `petran_staff`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffClaims {
    pub sub: String, // usuario_id
    pub email: String,
    pub rol: String,
    pub exp: usize,
    pub iat: usize,
}

/// Claims de la cookie legacy `petran_admin` (sin rol: siempre admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLegacyClaims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration,
        }
    }

    /// Timestamps (iat, exp) para un token emitido ahora
    pub fn timestamps(&self) -> (usize, usize) {
        let now = chrono::Utc::now();
        let expires_at = now + chrono::Duration::seconds(self.expiration);
        (now.timestamp() as usize, expires_at.timestamp() as usize)
    }
}

/// Firmar claims con el secreto de la configuración
pub fn generate_token<C: Serialize>(claims: &C, config: &JwtConfig) -> Result<String, AppError> {
    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))
}

/// Verificar y decodificar JWT token
pub fn verify_token<C: DeserializeOwned>(token: &str, config: &JwtConfig) -> Result<C, AppError> {
    validate_token_format(token)?;
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<C>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    Ok(token_data.claims)
}

/// Validar formato de token (básico)
pub fn validate_token_format(token: &str) -> Result<(), AppError> {
    if token.is_empty() {
        return Err(AppError::Jwt("Token no puede estar vacío".to_string()));
    }

    if token.split('.').count() != 3 {
        return Err(AppError::Jwt(
            "Token debe tener 3 partes separadas por puntos".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_claims(config: &JwtConfig) -> StaffClaims {
        let (iat, exp) = config.timestamps();
        StaffClaims {
            sub: "6f1c2a9e-0000-4000-8000-000000000001".to_string(),
            email: "inspector@petran.cl".to_string(),
            rol: "inspector".to_string(),
            exp,
            iat,
        }
    }

    #[test]
    fn test_generate_and_verify_token() {
        let config = JwtConfig::new("secreto-staff", 3600);
        let token = generate_token(&staff_claims(&config), &config).unwrap();

        let claims: StaffClaims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.email, "inspector@petran.cl");
        assert_eq!(claims.rol, "inspector");
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let config = JwtConfig::new("secreto-staff", 3600);
        let token = generate_token(&staff_claims(&config), &config).unwrap();

        let other = JwtConfig::new("secreto-cliente", 3600);
        assert!(verify_token::<StaffClaims>(&token, &other).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = JwtConfig::new("secreto-staff", -3600);
        let token = generate_token(&staff_claims(&config), &config).unwrap();
        assert!(verify_token::<StaffClaims>(&token, &config).is_err());
    }

    #[test]
    fn test_validate_token_format() {
        assert!(validate_token_format("").is_err());
        assert!(validate_token_format("sin-puntos").is_err());
        assert!(validate_token_format("a.b.c").is_ok());
    }
}
