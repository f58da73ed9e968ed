//! Hash y verificación de credenciales con bcrypt
//!
//! bcrypt es CPU-bound, así que corre en `spawn_blocking`.

use bcrypt::{hash, verify, DEFAULT_COST};
use rand::Rng;

use crate::utils::errors::AppError;

/// Hashear un PIN o contraseña
pub async fn hash_secret(secret: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(secret, DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("tarea de hash abortada: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

/// Verificar un PIN o contraseña contra su hash
pub async fn verify_secret(secret: String, hashed: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify(secret, &hashed))
        .await
        .map_err(|e| AppError::Internal(format!("tarea de verificación abortada: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

/// Generar un PIN aleatorio de 4 dígitos
pub fn generar_pin() -> String {
    format!("{:04}", rand::thread_rng().gen_range(0..10_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::validate_pin;

    #[tokio::test]
    async fn test_hash_and_verify_pin() {
        let hashed = hash_secret("0420".to_string()).await.unwrap();
        assert!(verify_secret("0420".to_string(), hashed.clone()).await.unwrap());
        assert!(!verify_secret("0421".to_string(), hashed).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_against_garbage_hash_is_error() {
        assert!(verify_secret("0420".to_string(), "no-es-bcrypt".to_string())
            .await
            .is_err());
    }

    #[test]
    fn test_generar_pin_is_valid() {
        for _ in 0..50 {
            assert!(validate_pin(&generar_pin()).is_ok());
        }
    }
}
