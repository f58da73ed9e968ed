use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::camion::Camion;
use crate::models::checklist::{ChecklistItem, EstadoRespuesta};
use crate::models::empresa::EmpresaResponse;
use crate::models::foto::FotoInspeccion;
use crate::models::inspeccion::{DetalleInspeccion, EstadoInspeccion, Inspeccion};
use crate::services::scoring_service::Evaluacion;

// Solicitud de inspección desde el portal cliente
#[derive(Debug, Deserialize, Validate)]
pub struct SolicitarInspeccionRequest {
    pub camion_id: Uuid,
    pub fecha_programada: DateTime<Utc>,

    #[validate(length(max = 2000))]
    pub observaciones: Option<String>,
}

// Programación desde el back-office
#[derive(Debug, Deserialize, Validate)]
pub struct ProgramarInspeccionRequest {
    pub camion_id: Uuid,
    pub fecha_programada: DateTime<Utc>,
    pub inspector_id: Option<Uuid>,

    #[validate(length(max = 2000))]
    pub observaciones: Option<String>,
}

// Reprogramar y/o asignar inspector
#[derive(Debug, Deserialize)]
pub struct ReprogramarInspeccionRequest {
    pub fecha_programada: Option<DateTime<Utc>>,
    pub inspector_id: Option<Uuid>,
}

// Filtros de la agenda
#[derive(Debug, Default, Deserialize)]
pub struct AgendaFilters {
    pub estado: Option<String>,
    pub desde: Option<DateTime<Utc>>,
    pub hasta: Option<DateTime<Utc>>,
    pub inspector_id: Option<Uuid>,
    pub empresa_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AgendaFilters {
    pub fn estado(&self) -> Result<Option<EstadoInspeccion>, String> {
        self.estado.as_deref().map(str::parse).transpose()
    }
}

// Respuesta a un ítem del checklist
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RespuestaItemRequest {
    #[validate(length(min = 1, max = 20))]
    pub item_codigo: String,

    pub estado: EstadoRespuesta,

    #[validate(length(max = 2000))]
    pub descripcion_falla: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GuardarRespuestasRequest {
    #[validate(length(min = 1, max = 500))]
    pub respuestas: Vec<RespuestaItemRequest>,
}

#[derive(Debug, Serialize)]
pub struct ProgresoChecklist {
    pub respondidos: usize,
    pub total: usize,
    pub faltantes: usize,
}

// Foto en base64 (puede venir como data URI)
#[derive(Debug, Deserialize, Validate)]
pub struct SubirFotoRequest {
    #[validate(length(min = 1))]
    pub imagen_base64: String,

    pub content_type: Option<String>,

    pub item_codigo: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FinalizarInspeccionRequest {
    #[validate(length(max = 2000))]
    pub observaciones: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FinalizarInspeccionResponse {
    pub inspeccion: Inspeccion,
    pub evaluacion: Evaluacion,
}

#[derive(Debug, Serialize)]
pub struct ChecklistResponse {
    pub version: &'static str,
    pub items: &'static [ChecklistItem],
}

// Informe completo de una inspección
#[derive(Debug, Serialize)]
pub struct InformeInspeccion {
    pub inspeccion: Inspeccion,
    pub camion: Camion,
    pub empresa: EmpresaResponse,
    pub inspector_nombre: Option<String>,
    pub detalles: Vec<DetalleInspeccion>,
    pub fotos: Vec<FotoInspeccion>,
}
