use crate::dto::staff_dto::LoginStaffRequest;
use crate::dto::ApiResponse;
use crate::models::usuario::{Usuario, UsuarioResponse};
use crate::repositories::usuario_repository::UsuarioRepository;
use crate::services::password_service::verify_secret;
use crate::services::session_service::StaffSession;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use validator::Validate;

pub struct StaffController {
    repository: UsuarioRepository,
}

impl StaffController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UsuarioRepository::new(pool),
        }
    }

    /// Login con email + contraseña
    pub async fn login(&self, request: LoginStaffRequest) -> Result<Usuario, AppError> {
        request.validate()?;

        let usuario = self
            .repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        let valido = verify_secret(request.password, usuario.password_hash.clone()).await?;
        if !valido {
            tracing::warn!(email = %usuario.email, "intento de login staff con contraseña incorrecta");
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        if !usuario.activo {
            return Err(AppError::Forbidden("El usuario está desactivado".to_string()));
        }

        tracing::info!(usuario_id = %usuario.id, rol = %usuario.rol, "🔐 login staff");
        Ok(usuario)
    }

    pub async fn me(&self, sesion: &StaffSession) -> Result<ApiResponse<UsuarioResponse>, AppError> {
        let usuario = self
            .repository
            .find_by_id(sesion.usuario_id)
            .await?
            .filter(|u| u.activo)
            .ok_or_else(|| AppError::Unauthorized("La sesión ya no es válida".to_string()))?;

        Ok(ApiResponse::success(UsuarioResponse::from(usuario)))
    }
}
