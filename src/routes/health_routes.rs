use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health - liveness; no toca la base de datos
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
