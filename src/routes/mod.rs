//! Rutas de la API
//!
//! Cada archivo arma un router por área; aquí se montan con las capas
//! comunes (trace, compresión, CORS).

pub mod admin_routes;
pub mod cliente_routes;
pub mod health_routes;
pub mod informe_routes;
pub mod inspector_routes;
pub mod staff_routes;

use axum::{
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::dto::ApiResponse;
use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .merge(health_routes::create_health_router())
        .nest("/api/cliente", cliente_routes::create_cliente_router(state.clone()))
        .nest("/api/staff", staff_routes::create_staff_router(state.clone()))
        .nest("/api/inspector", inspector_routes::create_inspector_router(&state))
        .nest("/api/admin", admin_routes::create_admin_router())
        .merge(informe_routes::create_informe_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

/// Respuesta de logout: expira las tres cookies de sesión
pub(crate) fn cookies_logout(state: &AppState) -> impl IntoResponse {
    let cookies: Vec<_> = state
        .sessions
        .cookies_logout()
        .into_iter()
        .map(|cookie| (SET_COOKIE, cookie))
        .collect();

    (
        AppendHeaders(cookies),
        Json(ApiResponse::success_with_message((), "Sesión cerrada")),
    )
}
