//! Servicio de sesiones
//!
//! Centraliza las tres cookies de sesión (`petran_cliente`, `petran_staff` y la
//! legacy `petran_admin`), cada una firmada con su propio secreto.

use axum::http::{HeaderMap, HeaderValue};
use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::models::empresa::Empresa;
use crate::models::usuario::{Rol, Usuario};
use crate::utils::cookies::{expired_cookie, get_cookie, session_cookie};
use crate::utils::errors::AppError;
use crate::utils::jwt::{
    generate_token, verify_token, AdminLegacyClaims, ClienteClaims, JwtConfig, StaffClaims,
};

/// Tipos de sesión y sus cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoSesion {
    Cliente,
    Staff,
    AdminLegacy,
}

impl TipoSesion {
    pub const TODAS: [TipoSesion; 3] = [TipoSesion::Cliente, TipoSesion::Staff, TipoSesion::AdminLegacy];

    pub fn cookie_name(self) -> &'static str {
        match self {
            TipoSesion::Cliente => "petran_cliente",
            TipoSesion::Staff => "petran_staff",
            TipoSesion::AdminLegacy => "petran_admin",
        }
    }
}

/// Sesión de empresa cliente
#[derive(Debug, Clone)]
pub struct ClienteSession {
    pub empresa_id: Uuid,
    pub rut: String,
    pub nombre: String,
}

/// Sesión de usuario staff
#[derive(Debug, Clone)]
pub struct StaffSession {
    pub usuario_id: Uuid,
    pub email: String,
    pub rol: Rol,
    /// Sesión leída desde la cookie `petran_admin`
    pub legacy: bool,
}

#[derive(Debug, Clone)]
pub struct SessionService {
    cliente: JwtConfig,
    staff: JwtConfig,
    admin_legacy: Option<JwtConfig>,
    ttl_secs: i64,
    secure: bool,
}

impl SessionService {
    pub fn new(config: &EnvironmentConfig) -> Self {
        let ttl_secs = config.session_ttl_hours * 3600;
        Self {
            cliente: JwtConfig::new(config.jwt_secret_cliente.clone(), ttl_secs),
            staff: JwtConfig::new(config.jwt_secret_staff.clone(), ttl_secs),
            admin_legacy: config
                .jwt_secret_admin_legacy
                .as_ref()
                .map(|secret| JwtConfig::new(secret.clone(), ttl_secs)),
            ttl_secs,
            secure: config.is_production(),
        }
    }

    /// Emitir la cookie de sesión de una empresa
    pub fn cookie_cliente(&self, empresa: &Empresa) -> Result<HeaderValue, AppError> {
        let (iat, exp) = self.cliente.timestamps();
        let claims = ClienteClaims {
            sub: empresa.id.to_string(),
            rut: empresa.rut.clone(),
            nombre: empresa.nombre.clone(),
            exp,
            iat,
        };
        let token = generate_token(&claims, &self.cliente)?;
        Ok(session_cookie(
            TipoSesion::Cliente.cookie_name(),
            &token,
            self.ttl_secs,
            self.secure,
        ))
    }

    /// Emitir la cookie de sesión de un usuario staff
    pub fn cookie_staff(&self, usuario: &Usuario) -> Result<HeaderValue, AppError> {
        let (iat, exp) = self.staff.timestamps();
        let claims = StaffClaims {
            sub: usuario.id.to_string(),
            email: usuario.email.clone(),
            rol: usuario.rol.as_str().to_string(),
            exp,
            iat,
        };
        let token = generate_token(&claims, &self.staff)?;
        Ok(session_cookie(
            TipoSesion::Staff.cookie_name(),
            &token,
            self.ttl_secs,
            self.secure,
        ))
    }

    /// Cookies expiradas para cerrar todas las sesiones
    pub fn cookies_logout(&self) -> Vec<HeaderValue> {
        TipoSesion::TODAS
            .iter()
            .map(|tipo| expired_cookie(tipo.cookie_name(), self.secure))
            .collect()
    }

    /// Leer la sesión de cliente desde los headers
    pub fn leer_cliente(&self, headers: &HeaderMap) -> Result<ClienteSession, AppError> {
        let token = get_cookie(headers, TipoSesion::Cliente.cookie_name())
            .ok_or_else(|| AppError::Unauthorized("Sesión de cliente requerida".to_string()))?;

        let claims: ClienteClaims = verify_token(token, &self.cliente)?;
        Ok(ClienteSession {
            empresa_id: parse_sub(&claims.sub)?,
            rut: claims.rut,
            nombre: claims.nombre,
        })
    }

    /// Leer la sesión staff; la cookie legacy solo si su secreto está configurado
    pub fn leer_staff(&self, headers: &HeaderMap) -> Result<StaffSession, AppError> {
        if let Some(token) = get_cookie(headers, TipoSesion::Staff.cookie_name()) {
            let claims: StaffClaims = verify_token(token, &self.staff)?;
            let rol = claims
                .rol
                .parse::<Rol>()
                .map_err(|_| AppError::Unauthorized("Rol de sesión inválido".to_string()))?;
            return Ok(StaffSession {
                usuario_id: parse_sub(&claims.sub)?,
                email: claims.email,
                rol,
                legacy: false,
            });
        }

        if let (Some(config), Some(token)) = (
            self.admin_legacy.as_ref(),
            get_cookie(headers, TipoSesion::AdminLegacy.cookie_name()),
        ) {
            let claims: AdminLegacyClaims = verify_token(token, config)?;
            tracing::debug!(email = %claims.email, "sesión admin legacy aceptada");
            return Ok(StaffSession {
                usuario_id: parse_sub(&claims.sub)?,
                email: claims.email,
                rol: Rol::Admin,
                legacy: true,
            });
        }

        Err(AppError::Unauthorized("Sesión de staff requerida".to_string()))
    }
}

fn parse_sub(sub: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(sub).map_err(|_| AppError::Unauthorized("Sesión inválida".to_string()))
}
