//! Agenda de inspecciones del back-office
//!
//! Programación, reprogramación y cancelación, más el resumen del dashboard.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::database::is_unique_violation;
use crate::dto::admin_dto::{CamionFilters, ResumenResponse};
use crate::dto::inspeccion_dto::{AgendaFilters, ProgramarInspeccionRequest, ReprogramarInspeccionRequest};
use crate::dto::ApiResponse;
use crate::models::camion::CamionConEmpresa;
use crate::models::inspeccion::{EstadoInspeccion, Inspeccion, InspeccionResumen};
use crate::repositories::camion_repository::CamionRepository;
use crate::repositories::empresa_repository::EmpresaRepository;
use crate::repositories::inspeccion_repository::InspeccionRepository;
use crate::repositories::usuario_repository::UsuarioRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct AgendaController {
    inspecciones: InspeccionRepository,
    camiones: CamionRepository,
    usuarios: UsuarioRepository,
    empresas: EmpresaRepository,
    duracion: Duration,
}

/// La fecha programada debe ser futura
pub fn validar_fecha_futura(fecha: DateTime<Utc>, ahora: DateTime<Utc>) -> AppResult<()> {
    if fecha <= ahora {
        return Err(AppError::BadRequest(
            "La fecha programada debe ser futura".to_string(),
        ));
    }
    Ok(())
}

impl AgendaController {
    pub fn new(pool: PgPool, duracion_minutos: i64) -> Self {
        Self {
            inspecciones: InspeccionRepository::new(pool.clone()),
            camiones: CamionRepository::new(pool.clone()),
            usuarios: UsuarioRepository::new(pool.clone()),
            empresas: EmpresaRepository::new(pool),
            duracion: Duration::minutes(duracion_minutos),
        }
    }

    /// Programar una inspección
    ///
    /// Usado por el back-office y por el portal cliente (sin inspector).
    pub async fn programar(
        &self,
        request: ProgramarInspeccionRequest,
        solicitada_por_cliente: bool,
    ) -> Result<Inspeccion, AppError> {
        request.validate()?;
        validar_fecha_futura(request.fecha_programada, Utc::now())?;

        let camion = self
            .camiones
            .find_by_id(request.camion_id)
            .await?
            .ok_or_else(|| not_found_error("Camión", &request.camion_id.to_string()))?;
        if !camion.activo {
            return Err(AppError::BadRequest("El camión está dado de baja".to_string()));
        }

        if self.inspecciones.camion_tiene_abierta(camion.id, None).await? {
            return Err(AppError::Conflict(format!(
                "El camión {} ya tiene una inspección pendiente",
                camion.patente
            )));
        }

        if let Some(inspector_id) = request.inspector_id {
            self.verificar_inspector(inspector_id, request.fecha_programada, None)
                .await?;
        }

        let observaciones = request
            .observaciones
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty());

        let inspeccion = self
            .inspecciones
            .create(
                camion.id,
                request.inspector_id,
                request.fecha_programada,
                observaciones,
                solicitada_por_cliente,
            )
            .await
            .map_err(|e| match e {
                // otra programación concurrente ganó el índice de inspección abierta
                AppError::Database(ref db) if is_unique_violation(db) => AppError::Conflict(format!(
                    "El camión {} ya tiene una inspección pendiente",
                    camion.patente
                )),
                otro => otro,
            })?;

        notificar_programacion(&inspeccion, &camion.patente);
        Ok(inspeccion)
    }

    /// Cambiar fecha y/o inspector mientras la inspección sigue programada
    pub async fn reprogramar(
        &self,
        id: Uuid,
        request: ReprogramarInspeccionRequest,
    ) -> Result<ApiResponse<Inspeccion>, AppError> {
        if request.fecha_programada.is_none() && request.inspector_id.is_none() {
            return Err(AppError::BadRequest(
                "Debe indicar una nueva fecha o un inspector".to_string(),
            ));
        }

        let actual = self
            .inspecciones
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Inspección", &id.to_string()))?;

        if actual.estado != EstadoInspeccion::Programada {
            return Err(AppError::Conflict(format!(
                "Solo se pueden reprogramar inspecciones PROGRAMADA (actual: {})",
                actual.estado
            )));
        }

        if let Some(fecha) = request.fecha_programada {
            validar_fecha_futura(fecha, Utc::now())?;
        }

        let fecha = request.fecha_programada.unwrap_or(actual.fecha_programada);
        if let Some(inspector_id) = request.inspector_id.or(actual.inspector_id) {
            self.verificar_inspector(inspector_id, fecha, Some(id)).await?;
        }

        let inspeccion = self
            .inspecciones
            .reprogramar(id, request.fecha_programada, request.inspector_id)
            .await?
            .ok_or_else(|| AppError::Conflict("La inspección cambió de estado".to_string()))?;

        let patente = self
            .camiones
            .find_by_id(inspeccion.camion_id)
            .await?
            .map(|c| c.patente)
            .unwrap_or_default();
        notificar_programacion(&inspeccion, &patente);

        Ok(ApiResponse::success_with_message(inspeccion, "Inspección reprogramada"))
    }

    pub async fn cancelar(&self, id: Uuid) -> Result<ApiResponse<Inspeccion>, AppError> {
        let actual = self
            .inspecciones
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Inspección", &id.to_string()))?;

        actual.verificar_transicion(EstadoInspeccion::Cancelada)?;

        let inspeccion = self
            .inspecciones
            .cambiar_estado(id, actual.estado, EstadoInspeccion::Cancelada)
            .await?
            .ok_or_else(|| AppError::Conflict("La inspección cambió de estado".to_string()))?;

        tracing::info!(inspeccion_id = %id, desde = %actual.estado, "❌ inspección cancelada");
        Ok(ApiResponse::success_with_message(inspeccion, "Inspección cancelada"))
    }

    pub async fn listar(&self, filters: AgendaFilters) -> Result<ApiResponse<Vec<InspeccionResumen>>, AppError> {
        let estado = filters.estado().map_err(AppError::BadRequest)?;
        let inspecciones = self.inspecciones.list_resumen(&filters, estado).await?;
        Ok(ApiResponse::success(inspecciones))
    }

    pub async fn camiones(&self, filters: CamionFilters) -> Result<ApiResponse<Vec<CamionConEmpresa>>, AppError> {
        let camiones = self.camiones.list_admin(&filters).await?;
        Ok(ApiResponse::success(camiones))
    }

    pub async fn resumen(&self) -> Result<ApiResponse<ResumenResponse>, AppError> {
        let (por_estado, por_resultado, promedio, empresas, camiones) = futures::try_join!(
            self.inspecciones.conteo_por_estado(),
            self.inspecciones.conteo_por_resultado(),
            self.inspecciones.puntaje_promedio(),
            self.empresas.count_activas(),
            self.camiones.count_activos(),
        )?;

        let mut conteo_estados: BTreeMap<String, i64> = EstadoInspeccion::TODOS
            .iter()
            .map(|e| (e.as_str().to_string(), 0))
            .collect();
        conteo_estados.extend(por_estado);

        Ok(ApiResponse::success(ResumenResponse {
            por_estado: conteo_estados,
            por_resultado: por_resultado.into_iter().collect(),
            empresas_activas: empresas,
            camiones_activos: camiones,
            puntaje_promedio: promedio.map(|p| (p * 10.0).round() / 10.0),
        }))
    }

    /// El inspector debe existir, estar activo, poder inspeccionar y no tener
    /// otra inspección abierta dentro de la duración configurada
    async fn verificar_inspector(
        &self,
        inspector_id: Uuid,
        fecha: DateTime<Utc>,
        excluir: Option<Uuid>,
    ) -> AppResult<()> {
        let inspector = self
            .usuarios
            .find_by_id(inspector_id)
            .await?
            .filter(|u| u.activo)
            .ok_or_else(|| AppError::BadRequest("Inspector no encontrado o inactivo".to_string()))?;

        if !inspector.rol.inspecciona() {
            return Err(AppError::BadRequest(format!(
                "{} no tiene rol de inspector",
                inspector.nombre
            )));
        }

        if self
            .inspecciones
            .inspector_ocupado(inspector_id, fecha, self.duracion, excluir)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "{} ya tiene una inspección cercana a esa hora",
                inspector.nombre
            )));
        }

        Ok(())
    }
}

/// Aviso de programación; queda en el log estructurado
fn notificar_programacion(inspeccion: &Inspeccion, patente: &str) {
    tracing::info!(
        target: "petran::notificaciones",
        inspeccion_id = %inspeccion.id,
        patente = %patente,
        inspector_id = ?inspeccion.inspector_id,
        fecha = %inspeccion.fecha_programada,
        solicitada_por_cliente = inspeccion.solicitada_por_cliente,
        "📅 inspección programada"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fecha_futura() {
        let ahora = Utc::now();
        assert!(validar_fecha_futura(ahora + Duration::hours(1), ahora).is_ok());
        assert!(matches!(
            validar_fecha_futura(ahora, ahora),
            Err(AppError::BadRequest(_))
        ));
        assert!(validar_fecha_futura(ahora - Duration::days(1), ahora).is_err());
    }

    #[test]
    fn test_observaciones_con_largo_maximo() {
        let request = |largo: usize| ProgramarInspeccionRequest {
            camion_id: Uuid::new_v4(),
            fecha_programada: Utc::now() + Duration::days(1),
            inspector_id: None,
            observaciones: Some("x".repeat(largo)),
        };
        assert!(request(2000).validate().is_ok());
        let errores = request(2001).validate().unwrap_err();
        assert!(errores.field_errors().contains_key("observaciones"));
    }
}
