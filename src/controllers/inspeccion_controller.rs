//! Ejecución de inspecciones por el inspector
//!
//! Iniciar, responder el checklist, subir fotos y finalizar con puntaje.

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::inspeccion_dto::{
    ChecklistResponse, FinalizarInspeccionRequest, FinalizarInspeccionResponse,
    GuardarRespuestasRequest, ProgresoChecklist, SubirFotoRequest,
};
use crate::dto::ApiResponse;
use crate::models::checklist::{buscar_item, EstadoRespuesta, CATALOGO, CATALOGO_VERSION};
use crate::models::foto::{FotoInspeccion, NuevaFoto};
use crate::models::inspeccion::{EstadoInspeccion, Inspeccion, InspeccionResumen};
use crate::models::usuario::Rol;
use crate::repositories::foto_repository::FotoRepository;
use crate::repositories::inspeccion_repository::{InspeccionRepository, RespuestaDetalle};
use crate::services::media_service::{decodificar_imagen, MediaHost};
use crate::services::scoring_service::evaluar;
use crate::services::session_service::StaffSession;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct InspeccionController {
    inspecciones: InspeccionRepository,
    fotos: FotoRepository,
    media: Option<Arc<dyn MediaHost>>,
    foto_max_bytes: usize,
}

impl InspeccionController {
    pub fn new(pool: PgPool, media: Option<Arc<dyn MediaHost>>, foto_max_bytes: usize) -> Self {
        Self {
            inspecciones: InspeccionRepository::new(pool.clone()),
            fotos: FotoRepository::new(pool),
            media,
            foto_max_bytes,
        }
    }

    pub async fn agenda(&self, sesion: &StaffSession) -> Result<ApiResponse<Vec<InspeccionResumen>>, AppError> {
        let agenda = self.inspecciones.agenda_inspector(sesion.usuario_id).await?;
        Ok(ApiResponse::success(agenda))
    }

    pub fn checklist() -> ApiResponse<ChecklistResponse> {
        ApiResponse::success(ChecklistResponse {
            version: CATALOGO_VERSION,
            items: CATALOGO.as_slice(),
        })
    }

    pub async fn iniciar(&self, sesion: &StaffSession, id: Uuid) -> Result<ApiResponse<Inspeccion>, AppError> {
        let actual = self.cargar_propia(sesion, id).await?;
        actual.verificar_transicion(EstadoInspeccion::EnProgreso)?;

        let inspeccion = self
            .inspecciones
            .cambiar_estado(id, actual.estado, EstadoInspeccion::EnProgreso)
            .await?
            .ok_or_else(|| AppError::Conflict("La inspección cambió de estado".to_string()))?;

        tracing::info!(inspeccion_id = %id, inspector_id = %sesion.usuario_id, "▶️ inspección iniciada");
        Ok(ApiResponse::success_with_message(inspeccion, "Inspección iniciada"))
    }

    /// Guardar (upsert) respuestas del checklist
    pub async fn guardar_respuestas(
        &self,
        sesion: &StaffSession,
        id: Uuid,
        request: GuardarRespuestasRequest,
    ) -> Result<ApiResponse<ProgresoChecklist>, AppError> {
        request.validate()?;
        let actual = self.cargar_propia(sesion, id).await?;
        actual.exigir_en_progreso()?;

        let respuestas = preparar_respuestas(request)?;
        self.inspecciones.guardar_respuestas(id, &respuestas).await?;

        let respondidos = self.inspecciones.detalles(id).await?.len();
        let total = CATALOGO.len();
        Ok(ApiResponse::success(ProgresoChecklist {
            respondidos,
            total,
            faltantes: total.saturating_sub(respondidos),
        }))
    }

    /// Subir una foto de evidencia, al media host o en línea
    pub async fn subir_foto(
        &self,
        sesion: &StaffSession,
        id: Uuid,
        request: SubirFotoRequest,
    ) -> Result<ApiResponse<FotoInspeccion>, AppError> {
        request.validate()?;
        let actual = self.cargar_propia(sesion, id).await?;
        actual.exigir_en_progreso()?;

        let detalle_id = match request.item_codigo.as_deref() {
            Some(codigo) => Some(
                self.inspecciones
                    .find_detalle_id(id, codigo)
                    .await?
                    .ok_or_else(|| {
                        AppError::BadRequest(format!("El ítem {} aún no tiene respuesta", codigo))
                    })?,
            ),
            None => None,
        };

        let imagen = decodificar_imagen(
            &request.imagen_base64,
            request.content_type.as_deref(),
            self.foto_max_bytes,
        )?;
        let tamano_bytes = i32::try_from(imagen.datos.len())
            .map_err(|_| AppError::PayloadTooLarge("La foto es demasiado grande".to_string()))?;

        let nueva = match &self.media {
            Some(media) => {
                let subida = media.subir(&imagen, &id.to_string()).await?;
                NuevaFoto {
                    inspeccion_id: id,
                    detalle_id,
                    url: Some(subida.url),
                    public_id: subida.public_id,
                    datos: None,
                    content_type: imagen.content_type,
                    tamano_bytes,
                }
            }
            None => NuevaFoto {
                inspeccion_id: id,
                detalle_id,
                url: None,
                public_id: None,
                datos: Some(imagen.datos),
                content_type: imagen.content_type,
                tamano_bytes,
            },
        };

        let foto = self.fotos.create(&nueva).await?;
        tracing::info!(inspeccion_id = %id, foto_id = %foto.id, bytes = tamano_bytes, "📸 foto registrada");
        Ok(ApiResponse::success(foto))
    }

    /// Finalizar: verificar checklist completo, calcular puntaje y cerrar
    pub async fn finalizar(
        &self,
        sesion: &StaffSession,
        id: Uuid,
        request: FinalizarInspeccionRequest,
    ) -> Result<ApiResponse<FinalizarInspeccionResponse>, AppError> {
        request.validate()?;
        self.cargar_propia(sesion, id).await?;

        let observaciones = request
            .observaciones
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty());

        let (inspeccion, evaluacion) = self
            .inspecciones
            .finalizar(id, observaciones, |_, detalles| {
                let respuestas: HashMap<String, EstadoRespuesta> = detalles
                    .iter()
                    .map(|d| (d.item_codigo.clone(), d.estado))
                    .collect();
                Ok(evaluar(&CATALOGO, &respuestas)?)
            })
            .await?;

        tracing::info!(
            inspeccion_id = %id,
            puntaje = evaluacion.puntaje,
            resultado = %evaluacion.resultado,
            fallas = evaluacion.total_fallas(),
            "✅ inspección finalizada"
        );

        Ok(ApiResponse::success_with_message(
            FinalizarInspeccionResponse { inspeccion, evaluacion },
            "Inspección finalizada",
        ))
    }

    /// Cargar la inspección y verificar que esté asignada al inspector
    async fn cargar_propia(&self, sesion: &StaffSession, id: Uuid) -> AppResult<Inspeccion> {
        let inspeccion = self
            .inspecciones
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Inspección", &id.to_string()))?;

        verificar_asignacion(sesion, &inspeccion)?;
        Ok(inspeccion)
    }
}

/// Un inspector solo actúa sobre inspecciones asignadas a él; admin sobre cualquiera
fn verificar_asignacion(sesion: &StaffSession, inspeccion: &Inspeccion) -> AppResult<()> {
    if sesion.rol == Rol::Admin || inspeccion.inspector_id == Some(sesion.usuario_id) {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "La inspección no está asignada a este inspector".to_string(),
    ))
}

/// Validar respuestas contra el catálogo; `no_cumple` exige descripción
fn preparar_respuestas(request: GuardarRespuestasRequest) -> AppResult<Vec<RespuestaDetalle>> {
    let mut respuestas: Vec<RespuestaDetalle> = Vec::with_capacity(request.respuestas.len());

    for respuesta in request.respuestas {
        respuesta.validate()?;

        let codigo = respuesta.item_codigo.trim().to_uppercase();
        let item = buscar_item(&codigo).ok_or_else(|| {
            AppError::BadRequest(format!("Ítem de checklist desconocido: {}", codigo))
        })?;

        let descripcion = respuesta
            .descripcion_falla
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        if respuesta.estado == EstadoRespuesta::NoCumple && descripcion.is_none() {
            return Err(AppError::BadRequest(format!(
                "El ítem {} no cumple y requiere descripción de la falla",
                codigo
            )));
        }

        let detalle = RespuestaDetalle {
            item_codigo: codigo,
            nivel: item.nivel,
            estado: respuesta.estado,
            // solo las fallas guardan descripción
            descripcion_falla: descripcion.filter(|_| respuesta.estado == EstadoRespuesta::NoCumple),
        };

        // la última respuesta a un mismo ítem gana
        match respuestas.iter_mut().find(|r| r.item_codigo == detalle.item_codigo) {
            Some(existente) => *existente = detalle,
            None => respuestas.push(detalle),
        }
    }

    Ok(respuestas)
}
