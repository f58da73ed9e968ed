//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Configuración del media host externo para fotos de inspección
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub upload_url: String,
    pub upload_preset: String,
    pub folder: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret_cliente: String,
    pub jwt_secret_staff: String,
    /// Secreto de la cookie `petran_admin`; sin él la cookie legacy se ignora
    pub jwt_secret_admin_legacy: Option<String>,
    pub session_ttl_hours: i64,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    /// Tomar la IP de `x-forwarded-for` (solo detrás de un proxy propio)
    pub trust_proxy: bool,
    pub media: Option<MediaConfig>,
    pub foto_max_bytes: usize,
    pub inspeccion_duracion_minutos: i64,
}

impl EnvironmentConfig {
    /// Leer la configuración desde variables de entorno
    pub fn from_env() -> Result<Self> {
        let media = match env::var("MEDIA_UPLOAD_URL").ok().filter(|v| !v.trim().is_empty()) {
            Some(upload_url) => Some(MediaConfig {
                upload_url,
                upload_preset: required("MEDIA_UPLOAD_PRESET")?,
                folder: env::var("MEDIA_FOLDER").unwrap_or_else(|_| "petran".to_string()),
            }),
            None => None,
        };

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: parsed_or("PORT", 3000)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 20)?,
            jwt_secret_cliente: required("JWT_SECRET_CLIENTE")?,
            jwt_secret_staff: required("JWT_SECRET_STAFF")?,
            jwt_secret_admin_legacy: env::var("JWT_SECRET_ADMIN_LEGACY")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            session_ttl_hours: parsed_or("SESSION_TTL_HOURS", 12)?,
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            rate_limit_requests: parsed_or("RATE_LIMIT_REQUESTS", 10)?,
            rate_limit_window: parsed_or("RATE_LIMIT_WINDOW", 60)?,
            trust_proxy: parsed_or("TRUST_PROXY", false)?,
            media,
            foto_max_bytes: parsed_or("FOTO_MAX_BYTES", 5 * 1024 * 1024)?,
            inspeccion_duracion_minutos: parsed_or("INSPECCION_DURACION_MINUTOS", 60)?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{} must be set", key))
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value", key)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url() {
        let config = EnvironmentConfig {
            environment: "production".to_string(),
            port: 8080,
            host: "127.0.0.1".to_string(),
            database_url: "postgres://localhost/petran".to_string(),
            database_max_connections: 5,
            jwt_secret_cliente: "c".to_string(),
            jwt_secret_staff: "s".to_string(),
            jwt_secret_admin_legacy: None,
            session_ttl_hours: 12,
            cors_origins: vec![],
            rate_limit_requests: 10,
            rate_limit_window: 60,
            trust_proxy: false,
            media: None,
            foto_max_bytes: 1024,
            inspeccion_duracion_minutos: 60,
        };

        assert_eq!(config.server_url(), "127.0.0.1:8080");
        assert!(config.is_production());
        assert!(!config.is_development());
    }

    #[test]
    fn test_parsed_or_uses_default_when_missing() {
        let value: u32 = parsed_or("PETRAN_TEST_VARIABLE_QUE_NO_EXISTE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
