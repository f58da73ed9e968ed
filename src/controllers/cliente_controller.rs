use crate::controllers::agenda_controller::AgendaController;
use crate::dto::cliente_dto::{LoginClienteRequest, RegistroClienteRequest, SesionClienteResponse};
use crate::dto::inspeccion_dto::{ProgramarInspeccionRequest, SolicitarInspeccionRequest};
use crate::dto::ApiResponse;
use crate::models::empresa::{Empresa, EmpresaResponse, NuevaEmpresa};
use crate::models::inspeccion::{Inspeccion, InspeccionResumen};
use crate::repositories::camion_repository::CamionRepository;
use crate::repositories::empresa_repository::EmpresaRepository;
use crate::repositories::inspeccion_repository::InspeccionRepository;
use crate::services::password_service::{hash_secret, verify_secret};
use crate::utils::errors::AppError;
use crate::utils::validation::normalizar_rut;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct ClienteController {
    empresas: EmpresaRepository,
    camiones: CamionRepository,
    inspecciones: InspeccionRepository,
}

impl ClienteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            empresas: EmpresaRepository::new(pool.clone()),
            camiones: CamionRepository::new(pool.clone()),
            inspecciones: InspeccionRepository::new(pool),
        }
    }

    /// Registrar una empresa desde el portal; devuelve la empresa para emitir la sesión
    pub async fn registro(&self, request: RegistroClienteRequest) -> Result<Empresa, AppError> {
        request.validate()?;

        let rut = normalizar_rut(&request.rut);
        if self.empresas.rut_exists(&rut).await? {
            return Err(AppError::Conflict("El RUT ya está registrado".to_string()));
        }

        let pin_hash = hash_secret(request.pin).await?;
        let nueva = NuevaEmpresa {
            nombre: request.nombre.trim().to_string(),
            rut,
            giro: request.giro,
            direccion: request.direccion,
            contacto_nombre: request.contacto_nombre,
            contacto_email: request.contacto_email,
            contacto_telefono: request.contacto_telefono,
            pin_hash,
            prioridad_alta: false,
            inspeccion_mensual: false,
        };

        let empresa = self.empresas.create(&nueva).await?;
        tracing::info!(empresa_id = %empresa.id, rut = %empresa.rut, "🏢 empresa registrada desde el portal");
        Ok(empresa)
    }

    /// Login con RUT + PIN
    pub async fn login(&self, request: LoginClienteRequest) -> Result<Empresa, AppError> {
        request.validate()?;

        let rut = normalizar_rut(&request.rut);
        let empresa = self
            .empresas
            .find_by_rut(&rut)
            .await?
            .ok_or_else(|| AppError::Unauthorized("RUT o PIN incorrectos".to_string()))?;

        let valido = verify_secret(request.pin, empresa.pin_hash.clone()).await?;
        if !valido {
            tracing::warn!(rut = %rut, "intento de login de cliente con PIN incorrecto");
            return Err(AppError::Unauthorized("RUT o PIN incorrectos".to_string()));
        }

        if !empresa.activa {
            return Err(AppError::Forbidden("La empresa está desactivada".to_string()));
        }

        Ok(empresa)
    }

    pub async fn me(&self, empresa_id: Uuid) -> Result<ApiResponse<SesionClienteResponse>, AppError> {
        let empresa = self
            .empresas
            .find_by_id(empresa_id)
            .await?
            .filter(|e| e.activa)
            .ok_or_else(|| AppError::Unauthorized("La sesión ya no es válida".to_string()))?;

        Ok(ApiResponse::success(SesionClienteResponse {
            empresa: EmpresaResponse::from(empresa),
        }))
    }

    pub async fn inspecciones(&self, empresa_id: Uuid) -> Result<ApiResponse<Vec<InspeccionResumen>>, AppError> {
        let inspecciones = self.inspecciones.list_by_empresa(empresa_id).await?;
        Ok(ApiResponse::success(inspecciones))
    }

    /// Solicitar una inspección para un camión propio, sin inspector asignado
    pub async fn solicitar_inspeccion(
        &self,
        empresa_id: Uuid,
        request: SolicitarInspeccionRequest,
        agenda: &AgendaController,
    ) -> Result<ApiResponse<Inspeccion>, AppError> {
        request.validate()?;

        // un camión ajeno se reporta como inexistente
        match self.camiones.find_empresa_id(request.camion_id).await? {
            Some(dueno) if dueno == empresa_id => {}
            _ => return Err(AppError::NotFound("Camión no encontrado".to_string())),
        }

        let inspeccion = agenda
            .programar(
                ProgramarInspeccionRequest {
                    camion_id: request.camion_id,
                    fecha_programada: request.fecha_programada,
                    inspector_id: None,
                    observaciones: request.observaciones,
                },
                true,
            )
            .await?;

        Ok(ApiResponse::success_with_message(inspeccion, "Inspección solicitada"))
    }
}
