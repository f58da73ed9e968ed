use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::informe_controller::InformeController;
use crate::dto::inspeccion_dto::InformeInspeccion;
use crate::dto::ApiResponse;
use crate::middleware::auth::SesionCualquiera;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_informe_router() -> Router<AppState> {
    Router::new()
        .route("/api/inspecciones/:id/informe", get(informe))
        .route("/api/fotos/:id", get(foto))
}

async fn informe(
    State(state): State<AppState>,
    sesion: SesionCualquiera,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<InformeInspeccion>>, AppError> {
    let controller = InformeController::new(state.pool.clone());
    Ok(Json(controller.informe(&sesion, id).await?))
}

/// Bytes de la foto o redirección 307 al media host
async fn foto(
    State(state): State<AppState>,
    sesion: SesionCualquiera,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let controller = InformeController::new(state.pool.clone());
    let foto = controller.foto(&sesion, id).await?;

    match (foto.url, foto.datos) {
        (Some(url), _) => Ok(Redirect::temporary(&url).into_response()),
        (None, Some(datos)) => Ok((
            [
                (header::CONTENT_TYPE, foto.content_type),
                (header::CACHE_CONTROL, "private, max-age=3600".to_string()),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
            ],
            datos,
        )
            .into_response()),
        (None, None) => Err(AppError::Internal(format!("foto {} sin contenido", id))),
    }
}
