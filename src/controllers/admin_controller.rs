//! Back-office: empresas y usuarios staff

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::admin_dto::{
    ActualizarEmpresaRequest, ActualizarUsuarioRequest, CrearEmpresaRequest, CrearUsuarioRequest,
    EmpresaCreadaResponse, EmpresaFilters, PinReseteadoResponse, UsuarioFilters,
};
use crate::dto::ApiResponse;
use crate::models::empresa::{EmpresaResponse, NuevaEmpresa};
use crate::models::usuario::UsuarioResponse;
use crate::repositories::empresa_repository::EmpresaRepository;
use crate::repositories::usuario_repository::UsuarioRepository;
use crate::services::password_service::{generar_pin, hash_secret};
use crate::services::session_service::StaffSession;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::normalizar_rut;

pub struct AdminController {
    empresas: EmpresaRepository,
    usuarios: UsuarioRepository,
}

impl AdminController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            empresas: EmpresaRepository::new(pool.clone()),
            usuarios: UsuarioRepository::new(pool),
        }
    }

    // ---- Empresas ----

    pub async fn crear_empresa(
        &self,
        request: CrearEmpresaRequest,
    ) -> Result<ApiResponse<EmpresaCreadaResponse>, AppError> {
        request.validate()?;

        let rut = normalizar_rut(&request.rut);
        if self.empresas.rut_exists(&rut).await? {
            return Err(AppError::Conflict("El RUT ya está registrado".to_string()));
        }

        // si no se envía PIN se genera uno y se muestra una sola vez
        let (pin, pin_generado) = match request.pin {
            Some(pin) => (pin, None),
            None => {
                let pin = generar_pin();
                (pin.clone(), Some(pin))
            }
        };

        let nueva = NuevaEmpresa {
            nombre: request.nombre.trim().to_string(),
            rut,
            giro: request.giro,
            direccion: request.direccion,
            contacto_nombre: request.contacto_nombre,
            contacto_email: request.contacto_email,
            contacto_telefono: request.contacto_telefono,
            pin_hash: hash_secret(pin).await?,
            prioridad_alta: request.prioridad_alta,
            inspeccion_mensual: request.inspeccion_mensual,
        };

        let empresa = self.empresas.create(&nueva).await?;
        tracing::info!(empresa_id = %empresa.id, "🏢 empresa creada desde back-office");

        Ok(ApiResponse::success_with_message(
            EmpresaCreadaResponse {
                empresa: EmpresaResponse::from(empresa),
                pin: pin_generado,
            },
            "Empresa creada",
        ))
    }

    pub async fn listar_empresas(
        &self,
        filters: EmpresaFilters,
    ) -> Result<ApiResponse<Vec<EmpresaResponse>>, AppError> {
        let empresas = self.empresas.list(&filters).await?;
        Ok(ApiResponse::success(
            empresas.into_iter().map(EmpresaResponse::from).collect(),
        ))
    }

    pub async fn obtener_empresa(&self, id: Uuid) -> Result<ApiResponse<EmpresaResponse>, AppError> {
        let empresa = self
            .empresas
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Empresa", &id.to_string()))?;

        Ok(ApiResponse::success(EmpresaResponse::from(empresa)))
    }

    pub async fn actualizar_empresa(
        &self,
        id: Uuid,
        request: ActualizarEmpresaRequest,
    ) -> Result<ApiResponse<EmpresaResponse>, AppError> {
        request.validate()?;

        let empresa = self
            .empresas
            .update(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Empresa", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(
            EmpresaResponse::from(empresa),
            "Empresa actualizada",
        ))
    }

    pub async fn desactivar_empresa(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        if !self.empresas.desactivar(id).await? {
            return Err(not_found_error("Empresa", &id.to_string()));
        }
        tracing::info!(empresa_id = %id, "empresa desactivada");
        Ok(ApiResponse::success_with_message((), "Empresa desactivada"))
    }

    /// Generar un PIN nuevo; se devuelve una sola vez
    pub async fn resetear_pin(&self, id: Uuid) -> Result<ApiResponse<PinReseteadoResponse>, AppError> {
        let pin = generar_pin();
        let pin_hash = hash_secret(pin.clone()).await?;

        if !self.empresas.update_pin(id, &pin_hash).await? {
            return Err(not_found_error("Empresa", &id.to_string()));
        }

        tracing::info!(empresa_id = %id, "🔑 PIN de empresa reseteado");
        Ok(ApiResponse::success(PinReseteadoResponse { empresa_id: id, pin }))
    }

    // ---- Usuarios ----

    pub async fn crear_usuario(
        &self,
        request: CrearUsuarioRequest,
    ) -> Result<ApiResponse<UsuarioResponse>, AppError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        if self.usuarios.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("El email ya está registrado".to_string()));
        }

        let password_hash = hash_secret(request.password).await?;
        let usuario = self
            .usuarios
            .create(request.nombre.trim(), &email, &password_hash, request.rol)
            .await?;

        tracing::info!(usuario_id = %usuario.id, rol = %usuario.rol, "👤 usuario staff creado");
        Ok(ApiResponse::success_with_message(
            UsuarioResponse::from(usuario),
            "Usuario creado",
        ))
    }

    pub async fn listar_usuarios(
        &self,
        filters: UsuarioFilters,
    ) -> Result<ApiResponse<Vec<UsuarioResponse>>, AppError> {
        let usuarios = self.usuarios.list(&filters).await?;
        Ok(ApiResponse::success(
            usuarios.into_iter().map(UsuarioResponse::from).collect(),
        ))
    }

    pub async fn actualizar_usuario(
        &self,
        sesion: &StaffSession,
        id: Uuid,
        request: ActualizarUsuarioRequest,
    ) -> Result<ApiResponse<UsuarioResponse>, AppError> {
        request.validate()?;

        if id == sesion.usuario_id && (request.activo == Some(false) || request.rol.is_some()) {
            return Err(AppError::BadRequest(
                "No puede cambiar su propio rol ni desactivarse".to_string(),
            ));
        }

        let password_hash = match request.password {
            Some(password) => Some(hash_secret(password).await?),
            None => None,
        };
        let email = request.email.map(|e| e.trim().to_lowercase());

        let usuario = self
            .usuarios
            .update(
                id,
                request.nombre.as_deref().map(str::trim),
                email.as_deref(),
                password_hash.as_deref(),
                request.rol,
                request.activo,
            )
            .await?
            .ok_or_else(|| not_found_error("Usuario", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(
            UsuarioResponse::from(usuario),
            "Usuario actualizado",
        ))
    }

    pub async fn desactivar_usuario(
        &self,
        sesion: &StaffSession,
        id: Uuid,
    ) -> Result<ApiResponse<()>, AppError> {
        if id == sesion.usuario_id {
            return Err(AppError::BadRequest("No puede desactivarse a sí mismo".to_string()));
        }
        if !self.usuarios.desactivar(id).await? {
            return Err(not_found_error("Usuario", &id.to_string()));
        }
        tracing::info!(usuario_id = %id, "usuario desactivado");
        Ok(ApiResponse::success_with_message((), "Usuario desactivado"))
    }
}
