use std::collections::HashSet;

use crate::dto::flota_dto::{RegistrarFlotaRequest, RegistrarFlotaResponse};
use crate::dto::ApiResponse;
use crate::models::camion::{Camion, NuevoCamion};
use crate::repositories::camion_repository::CamionRepository;
use crate::services::session_service::ClienteSession;
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::validation::{normalizar_patente, validate_anio};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct FlotaController {
    repository: CamionRepository,
}

impl FlotaController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CamionRepository::new(pool),
        }
    }

    /// Registrar uno o más camiones en la flota de la empresa
    pub async fn registrar(
        &self,
        sesion: &ClienteSession,
        request: RegistrarFlotaRequest,
    ) -> Result<ApiResponse<RegistrarFlotaResponse>, AppError> {
        request.validate()?;
        let camiones = preparar_camiones(request)?;

        let (proveedor, creados) = self
            .repository
            .registrar_flota(sesion.empresa_id, &sesion.nombre, &camiones)
            .await?;

        tracing::info!(
            empresa_id = %sesion.empresa_id,
            camiones = creados.len(),
            "🚛 flota registrada"
        );

        let total = creados.len();
        Ok(ApiResponse::success_with_message(
            RegistrarFlotaResponse {
                proveedor_id: proveedor.id,
                camiones: creados,
            },
            format!("{} camiones registrados", total),
        ))
    }

    pub async fn listar(&self, empresa_id: Uuid) -> Result<ApiResponse<Vec<Camion>>, AppError> {
        let camiones = self.repository.list_by_empresa(empresa_id).await?;
        Ok(ApiResponse::success(camiones))
    }
}

/// Validar cada camión, normalizar patentes y rechazar duplicados del lote
fn preparar_camiones(request: RegistrarFlotaRequest) -> AppResult<Vec<NuevoCamion>> {
    let mut vistas = HashSet::new();
    let mut duplicadas = Vec::new();
    let mut camiones = Vec::with_capacity(request.camiones.len());

    for camion in request.camiones {
        camion.validate()?;
        if let Some(anio) = camion.anio {
            validate_anio(anio).map_err(|_| validation_error("anio", "Año fuera de rango"))?;
        }

        let patente = normalizar_patente(&camion.patente);
        if !vistas.insert(patente.clone()) {
            duplicadas.push(patente.clone());
        }

        camiones.push(NuevoCamion {
            patente,
            marca: camion.marca.trim().to_string(),
            modelo: camion.modelo.trim().to_string(),
            anio: camion.anio,
            carroceria: camion.carroceria,
        });
    }

    if !duplicadas.is_empty() {
        duplicadas.sort();
        duplicadas.dedup();
        return Err(AppError::Conflict(format!(
            "Patentes repetidas en la solicitud: {}",
            duplicadas.join(", ")
        )));
    }

    Ok(camiones)
}
