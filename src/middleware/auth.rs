//! Extractores de autenticación
//!
//! Leen las cookies de sesión y verifican el rol del usuario staff. Los claims
//! firmados solo identifican la sesión: el rol y el estado activo se toman de
//! la fila vigente en la base, así una baja o un cambio de rol rige de
//! inmediato.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::models::usuario::Rol;
use crate::repositories::empresa_repository::EmpresaRepository;
use crate::repositories::usuario_repository::UsuarioRepository;
use crate::services::session_service::{ClienteSession, StaffSession};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Confirmar que la empresa de la sesión sigue existiendo y activa
async fn cliente_vigente(state: &AppState, sesion: ClienteSession) -> Result<ClienteSession, AppError> {
    let empresa = EmpresaRepository::new(state.pool.clone())
        .find_by_id(sesion.empresa_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Sesión inválida".to_string()))?;

    if !empresa.activa {
        return Err(AppError::Forbidden("La empresa está desactivada".to_string()));
    }
    Ok(sesion)
}

/// Refrescar la sesión staff con el rol y el estado actuales del usuario
async fn staff_vigente(state: &AppState, mut sesion: StaffSession) -> Result<StaffSession, AppError> {
    let usuario = UsuarioRepository::new(state.pool.clone())
        .find_by_id(sesion.usuario_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Sesión inválida".to_string()))?;

    if !usuario.activo {
        return Err(AppError::Forbidden("El usuario está desactivado".to_string()));
    }
    // la cookie legacy solo vale para quien sigue siendo admin
    if sesion.legacy && usuario.rol != Rol::Admin {
        return Err(AppError::Forbidden("Sesión legacy sin rol administrador".to_string()));
    }

    sesion.rol = usuario.rol;
    sesion.email = usuario.email;
    Ok(sesion)
}

/// Sesión staff con un rol permitido
///
/// El rol de los claims se revisa primero para rechazar sin consultar la base;
/// luego se vuelve a revisar con el rol vigente.
async fn staff_con_rol(
    parts: &Parts,
    state: &AppState,
    permitido: fn(Rol) -> bool,
    mensaje: &str,
) -> Result<StaffSession, AppError> {
    let sesion = state.sessions.leer_staff(&parts.headers)?;
    if !permitido(sesion.rol) {
        return Err(AppError::Forbidden(mensaje.to_string()));
    }

    let sesion = staff_vigente(state, sesion).await?;
    if !permitido(sesion.rol) {
        return Err(AppError::Forbidden(mensaje.to_string()));
    }
    Ok(sesion)
}

/// Empresa autenticada con la cookie `petran_cliente`
#[derive(Debug, Clone)]
pub struct SesionCliente(pub ClienteSession);

#[axum::async_trait]
impl FromRequestParts<AppState> for SesionCliente {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let sesion = state.sessions.leer_cliente(&parts.headers)?;
        Ok(SesionCliente(cliente_vigente(state, sesion).await?))
    }
}

/// Cualquier usuario staff (o sesión admin legacy)
#[derive(Debug, Clone)]
pub struct SesionStaff(pub StaffSession);

#[axum::async_trait]
impl FromRequestParts<AppState> for SesionStaff {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let sesion = state.sessions.leer_staff(&parts.headers)?;
        Ok(SesionStaff(staff_vigente(state, sesion).await?))
    }
}

/// Requiere rol `admin`
#[derive(Debug, Clone)]
pub struct RequiereAdmin(pub StaffSession);

#[axum::async_trait]
impl FromRequestParts<AppState> for RequiereAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let sesion = staff_con_rol(
            parts,
            state,
            |rol| rol == Rol::Admin,
            "Se requiere rol administrador",
        )
        .await?;
        Ok(RequiereAdmin(sesion))
    }
}

/// Requiere rol `admin` u `operador` (gestión de agenda)
#[derive(Debug, Clone)]
pub struct RequiereOperador(pub StaffSession);

#[axum::async_trait]
impl FromRequestParts<AppState> for RequiereOperador {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let sesion = staff_con_rol(
            parts,
            state,
            Rol::gestiona_agenda,
            "Se requiere rol administrador u operador",
        )
        .await?;
        Ok(RequiereOperador(sesion))
    }
}

/// Requiere rol `admin` o `inspector`
#[derive(Debug, Clone)]
pub struct RequiereInspector(pub StaffSession);

#[axum::async_trait]
impl FromRequestParts<AppState> for RequiereInspector {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let sesion = staff_con_rol(parts, state, Rol::inspecciona, "Se requiere rol inspector").await?;
        Ok(RequiereInspector(sesion))
    }
}

/// Cliente o staff, para recursos compartidos como informes y fotos
#[derive(Debug, Clone)]
pub enum SesionCualquiera {
    Cliente(ClienteSession),
    Staff(StaffSession),
}

#[axum::async_trait]
impl FromRequestParts<AppState> for SesionCualquiera {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // staff primero: un navegador puede tener ambas cookies
        if let Ok(staff) = state.sessions.leer_staff(&parts.headers) {
            return Ok(SesionCualquiera::Staff(staff_vigente(state, staff).await?));
        }
        match state.sessions.leer_cliente(&parts.headers) {
            Ok(cliente) => Ok(SesionCualquiera::Cliente(cliente_vigente(state, cliente).await?)),
            Err(_) => Err(AppError::Unauthorized("Sesión requerida".to_string())),
        }
    }
}
