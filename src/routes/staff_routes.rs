use axum::{
    extract::State,
    http::header::SET_COOKIE,
    middleware,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::staff_controller::StaffController;
use crate::dto::staff_dto::LoginStaffRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::SesionStaff;
use crate::middleware::rate_limit::login_rate_limit;
use crate::models::usuario::UsuarioResponse;
use crate::routes::cookies_logout;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_staff_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route_layer(middleware::from_fn_with_state(state, login_rate_limit))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginStaffRequest>,
) -> Result<impl IntoResponse, AppError> {
    let controller = StaffController::new(state.pool.clone());
    let usuario = controller.login(request).await?;
    let cookie = state.sessions.cookie_staff(&usuario)?;

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(ApiResponse::success(UsuarioResponse::from(usuario))),
    ))
}

async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    cookies_logout(&state)
}

async fn me(
    State(state): State<AppState>,
    SesionStaff(sesion): SesionStaff,
) -> Result<Json<ApiResponse<UsuarioResponse>>, AppError> {
    let controller = StaffController::new(state.pool.clone());
    let response = controller.me(&sesion).await?;
    Ok(Json(response))
}
