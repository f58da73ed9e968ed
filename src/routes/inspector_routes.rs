use axum::{
    extract::{DefaultBodyLimit, Path, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::inspeccion_controller::InspeccionController;
use crate::dto::inspeccion_dto::{
    ChecklistResponse, FinalizarInspeccionRequest, FinalizarInspeccionResponse,
    GuardarRespuestasRequest, ProgresoChecklist, SubirFotoRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::RequiereInspector;
use crate::models::foto::FotoInspeccion;
use crate::models::inspeccion::{Inspeccion, InspeccionResumen};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_inspector_router(state: &AppState) -> Router<AppState> {
    // base64 agrega ~33% al tamaño de la foto
    let limite_fotos = state.config.foto_max_bytes / 3 * 4 + 64 * 1024;

    Router::new()
        .route("/agenda", get(agenda))
        .route("/checklist", get(checklist))
        .route("/inspecciones/:id/iniciar", post(iniciar))
        .route("/inspecciones/:id/respuestas", put(guardar_respuestas))
        .route(
            "/inspecciones/:id/fotos",
            post(subir_foto).layer(DefaultBodyLimit::max(limite_fotos)),
        )
        .route("/inspecciones/:id/finalizar", post(finalizar))
}

fn controller(state: &AppState) -> InspeccionController {
    InspeccionController::new(
        state.pool.clone(),
        state.media.clone(),
        state.config.foto_max_bytes,
    )
}

async fn agenda(
    State(state): State<AppState>,
    RequiereInspector(sesion): RequiereInspector,
) -> Result<Json<ApiResponse<Vec<InspeccionResumen>>>, AppError> {
    let response = controller(&state).agenda(&sesion).await?;
    Ok(Json(response))
}

async fn checklist(_: RequiereInspector) -> Json<ApiResponse<ChecklistResponse>> {
    Json(InspeccionController::checklist())
}

async fn iniciar(
    State(state): State<AppState>,
    RequiereInspector(sesion): RequiereInspector,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Inspeccion>>, AppError> {
    let response = controller(&state).iniciar(&sesion, id).await?;
    Ok(Json(response))
}

async fn guardar_respuestas(
    State(state): State<AppState>,
    RequiereInspector(sesion): RequiereInspector,
    Path(id): Path<Uuid>,
    Json(request): Json<GuardarRespuestasRequest>,
) -> Result<Json<ApiResponse<ProgresoChecklist>>, AppError> {
    let response = controller(&state).guardar_respuestas(&sesion, id, request).await?;
    Ok(Json(response))
}

async fn subir_foto(
    State(state): State<AppState>,
    RequiereInspector(sesion): RequiereInspector,
    Path(id): Path<Uuid>,
    Json(request): Json<SubirFotoRequest>,
) -> Result<Json<ApiResponse<FotoInspeccion>>, AppError> {
    let response = controller(&state).subir_foto(&sesion, id, request).await?;
    Ok(Json(response))
}

async fn finalizar(
    State(state): State<AppState>,
    RequiereInspector(sesion): RequiereInspector,
    Path(id): Path<Uuid>,
    Json(request): Json<FinalizarInspeccionRequest>,
) -> Result<Json<ApiResponse<FinalizarInspeccionResponse>>, AppError> {
    let response = controller(&state).finalizar(&sesion, id, request).await?;
    Ok(Json(response))
}
