use axum::{
    extract::State,
    http::header::SET_COOKIE,
    middleware,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::agenda_controller::AgendaController;
use crate::controllers::cliente_controller::ClienteController;
use crate::controllers::flota_controller::FlotaController;
use crate::dto::cliente_dto::{LoginClienteRequest, RegistroClienteRequest, SesionClienteResponse};
use crate::dto::flota_dto::{RegistrarFlotaRequest, RegistrarFlotaResponse};
use crate::dto::inspeccion_dto::SolicitarInspeccionRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::SesionCliente;
use crate::middleware::rate_limit::login_rate_limit;
use crate::models::camion::Camion;
use crate::models::empresa::EmpresaResponse;
use crate::models::inspeccion::{Inspeccion, InspeccionResumen};
use crate::routes::cookies_logout;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_cliente_router(state: AppState) -> Router<AppState> {
    let login = Router::new()
        .route("/login", post(login))
        .route("/registro", post(registro))
        .route_layer(middleware::from_fn_with_state(state, login_rate_limit));

    Router::new()
        .merge(login)
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/flota", post(registrar_flota))
        .route("/camiones", get(camiones))
        .route("/inspecciones", get(inspecciones).post(solicitar_inspeccion))
}

async fn registro(
    State(state): State<AppState>,
    Json(request): Json<RegistroClienteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let controller = ClienteController::new(state.pool.clone());
    let empresa = controller.registro(request).await?;
    let cookie = state.sessions.cookie_cliente(&empresa)?;

    let response = ApiResponse::success_with_message(
        SesionClienteResponse {
            empresa: EmpresaResponse::from(empresa),
        },
        "Empresa registrada exitosamente",
    );
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginClienteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let controller = ClienteController::new(state.pool.clone());
    let empresa = controller.login(request).await?;
    let cookie = state.sessions.cookie_cliente(&empresa)?;

    let response = ApiResponse::success(SesionClienteResponse {
        empresa: EmpresaResponse::from(empresa),
    });
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(response)))
}

async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    cookies_logout(&state)
}

async fn me(
    State(state): State<AppState>,
    SesionCliente(sesion): SesionCliente,
) -> Result<Json<ApiResponse<SesionClienteResponse>>, AppError> {
    let controller = ClienteController::new(state.pool.clone());
    let response = controller.me(sesion.empresa_id).await?;
    Ok(Json(response))
}

async fn registrar_flota(
    State(state): State<AppState>,
    SesionCliente(sesion): SesionCliente,
    Json(request): Json<RegistrarFlotaRequest>,
) -> Result<Json<ApiResponse<RegistrarFlotaResponse>>, AppError> {
    let controller = FlotaController::new(state.pool.clone());
    let response = controller.registrar(&sesion, request).await?;
    Ok(Json(response))
}

async fn camiones(
    State(state): State<AppState>,
    SesionCliente(sesion): SesionCliente,
) -> Result<Json<ApiResponse<Vec<Camion>>>, AppError> {
    let controller = FlotaController::new(state.pool.clone());
    let response = controller.listar(sesion.empresa_id).await?;
    Ok(Json(response))
}

async fn inspecciones(
    State(state): State<AppState>,
    SesionCliente(sesion): SesionCliente,
) -> Result<Json<ApiResponse<Vec<InspeccionResumen>>>, AppError> {
    let controller = ClienteController::new(state.pool.clone());
    let response = controller.inspecciones(sesion.empresa_id).await?;
    Ok(Json(response))
}

async fn solicitar_inspeccion(
    State(state): State<AppState>,
    SesionCliente(sesion): SesionCliente,
    Json(request): Json<SolicitarInspeccionRequest>,
) -> Result<Json<ApiResponse<Inspeccion>>, AppError> {
    let controller = ClienteController::new(state.pool.clone());
    let agenda = AgendaController::new(state.pool.clone(), state.config.inspeccion_duracion_minutos);
    let response = controller
        .solicitar_inspeccion(sesion.empresa_id, request, &agenda)
        .await?;
    Ok(Json(response))
}
