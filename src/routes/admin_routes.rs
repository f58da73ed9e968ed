use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::admin_controller::AdminController;
use crate::controllers::agenda_controller::AgendaController;
use crate::dto::admin_dto::{
    ActualizarEmpresaRequest, ActualizarUsuarioRequest, CamionFilters, CrearEmpresaRequest,
    CrearUsuarioRequest, EmpresaCreadaResponse, EmpresaFilters, PinReseteadoResponse,
    ResumenResponse, UsuarioFilters,
};
use crate::dto::inspeccion_dto::{AgendaFilters, ProgramarInspeccionRequest, ReprogramarInspeccionRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::{RequiereAdmin, RequiereOperador};
use crate::models::camion::CamionConEmpresa;
use crate::models::empresa::EmpresaResponse;
use crate::models::inspeccion::{Inspeccion, InspeccionResumen};
use crate::models::usuario::UsuarioResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // Empresas (admin)
        .route("/empresas", get(listar_empresas).post(crear_empresa))
        .route(
            "/empresas/:id",
            get(obtener_empresa)
                .put(actualizar_empresa)
                .delete(desactivar_empresa),
        )
        .route("/empresas/:id/pin", post(resetear_pin))
        // Usuarios staff (admin)
        .route("/usuarios", get(listar_usuarios).post(crear_usuario))
        .route("/usuarios/:id", put(actualizar_usuario).delete(desactivar_usuario))
        // Agenda (admin u operador)
        .route("/camiones", get(listar_camiones))
        .route("/inspecciones", get(listar_inspecciones).post(programar))
        .route("/inspecciones/:id/programacion", put(reprogramar))
        .route("/inspecciones/:id/cancelar", post(cancelar))
        .route("/resumen", get(resumen))
}

fn agenda(state: &AppState) -> AgendaController {
    AgendaController::new(state.pool.clone(), state.config.inspeccion_duracion_minutos)
}

// ---- Empresas ----

async fn listar_empresas(
    State(state): State<AppState>,
    _: RequiereAdmin,
    Query(filters): Query<EmpresaFilters>,
) -> Result<Json<ApiResponse<Vec<EmpresaResponse>>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.listar_empresas(filters).await?))
}

async fn crear_empresa(
    State(state): State<AppState>,
    _: RequiereAdmin,
    Json(request): Json<CrearEmpresaRequest>,
) -> Result<Json<ApiResponse<EmpresaCreadaResponse>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.crear_empresa(request).await?))
}

async fn obtener_empresa(
    State(state): State<AppState>,
    _: RequiereAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EmpresaResponse>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.obtener_empresa(id).await?))
}

async fn actualizar_empresa(
    State(state): State<AppState>,
    _: RequiereAdmin,
    Path(id): Path<Uuid>,
    Json(request): Json<ActualizarEmpresaRequest>,
) -> Result<Json<ApiResponse<EmpresaResponse>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.actualizar_empresa(id, request).await?))
}

async fn desactivar_empresa(
    State(state): State<AppState>,
    _: RequiereAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.desactivar_empresa(id).await?))
}

async fn resetear_pin(
    State(state): State<AppState>,
    _: RequiereAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PinReseteadoResponse>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.resetear_pin(id).await?))
}

// ---- Usuarios ----

async fn listar_usuarios(
    State(state): State<AppState>,
    _: RequiereAdmin,
    Query(filters): Query<UsuarioFilters>,
) -> Result<Json<ApiResponse<Vec<UsuarioResponse>>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.listar_usuarios(filters).await?))
}

async fn crear_usuario(
    State(state): State<AppState>,
    _: RequiereAdmin,
    Json(request): Json<CrearUsuarioRequest>,
) -> Result<Json<ApiResponse<UsuarioResponse>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.crear_usuario(request).await?))
}

async fn actualizar_usuario(
    State(state): State<AppState>,
    RequiereAdmin(sesion): RequiereAdmin,
    Path(id): Path<Uuid>,
    Json(request): Json<ActualizarUsuarioRequest>,
) -> Result<Json<ApiResponse<UsuarioResponse>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.actualizar_usuario(&sesion, id, request).await?))
}

async fn desactivar_usuario(
    State(state): State<AppState>,
    RequiereAdmin(sesion): RequiereAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AdminController::new(state.pool.clone());
    Ok(Json(controller.desactivar_usuario(&sesion, id).await?))
}

// ---- Agenda ----

async fn listar_camiones(
    State(state): State<AppState>,
    _: RequiereOperador,
    Query(filters): Query<CamionFilters>,
) -> Result<Json<ApiResponse<Vec<CamionConEmpresa>>>, AppError> {
    Ok(Json(agenda(&state).camiones(filters).await?))
}

async fn listar_inspecciones(
    State(state): State<AppState>,
    _: RequiereOperador,
    Query(filters): Query<AgendaFilters>,
) -> Result<Json<ApiResponse<Vec<InspeccionResumen>>>, AppError> {
    Ok(Json(agenda(&state).listar(filters).await?))
}

async fn programar(
    State(state): State<AppState>,
    RequiereOperador(sesion): RequiereOperador,
    Json(request): Json<ProgramarInspeccionRequest>,
) -> Result<Json<ApiResponse<Inspeccion>>, AppError> {
    let inspeccion = agenda(&state).programar(request, false).await?;
    tracing::debug!(inspeccion_id = %inspeccion.id, programada_por = %sesion.email, "agenda actualizada");
    Ok(Json(ApiResponse::success_with_message(inspeccion, "Inspección programada")))
}

async fn reprogramar(
    State(state): State<AppState>,
    _: RequiereOperador,
    Path(id): Path<Uuid>,
    Json(request): Json<ReprogramarInspeccionRequest>,
) -> Result<Json<ApiResponse<Inspeccion>>, AppError> {
    Ok(Json(agenda(&state).reprogramar(id, request).await?))
}

async fn cancelar(
    State(state): State<AppState>,
    _: RequiereOperador,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Inspeccion>>, AppError> {
    Ok(Json(agenda(&state).cancelar(id).await?))
}

async fn resumen(
    State(state): State<AppState>,
    _: RequiereOperador,
) -> Result<Json<ApiResponse<ResumenResponse>>, AppError> {
    Ok(Json(agenda(&state).resumen().await?))
}
