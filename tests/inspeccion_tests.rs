//! Agenda y ejecución de inspecciones contra una base real.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use common::*;
use petran::database::is_unique_violation;
use petran::dto::inspeccion_dto::RespuestaItemRequest;
use petran::models::checklist::{EstadoRespuesta, NivelSeveridad, CATALOGO};
use petran::models::foto::NuevaFoto;
use petran::models::inspeccion::EstadoInspeccion;
use petran::models::usuario::Rol;
use petran::repositories::foto_repository::FotoRepository;
use petran::repositories::inspeccion_repository::{InspeccionRepository, RespuestaDetalle};
use petran::utils::errors::AppError;

fn uri(id: Uuid, accion: &str) -> String {
    format!("/api/inspector/inspecciones/{}/{}", id, accion)
}

/// Todo el catálogo en `cumple` salvo los códigos indicados
fn checklist_con_fallas(fallas: &[&str]) -> Value {
    let respuestas: Vec<Value> = CATALOGO
        .iter()
        .map(|item| {
            if fallas.contains(&item.codigo) {
                json!({ "item_codigo": item.codigo, "estado": "no_cumple", "descripcion_falla": "defecto" })
            } else {
                json!({ "item_codigo": item.codigo, "estado": "cumple" })
            }
        })
        .collect();
    json!({ "respuestas": respuestas })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_finalizar_incompleto_es_422_con_faltantes(pool: PgPool) {
    let inspector = crear_usuario(&pool, Rol::Inspector).await;
    let empresa = crear_empresa(&pool, "76086428-5").await;
    let camion = crear_camion(&pool, &empresa, "BBCD12").await;
    let inspeccion = crear_inspeccion(&pool, &camion, Some(&inspector), EstadoInspeccion::EnProgreso).await;
    let (app, state) = build_db_app(pool.clone());
    let cookie = cookie_de_usuario(&state, &inspector);

    let respuestas = json!({ "respuestas": [{ "item_codigo": "FRN-01", "estado": "cumple" }] });
    let (status, _, _) = send(
        &app,
        json_request("PUT", &uri(inspeccion.id, "respuestas"), Some(&cookie), respuestas),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(
        &app,
        json_request("POST", &uri(inspeccion.id, "finalizar"), Some(&cookie), json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "CHECKLIST_INCOMPLETO");
    assert_eq!(body["details"]["faltantes"], 23);
    let items = body["details"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 23);
    assert!(items.iter().any(|i| i == "FRN-02"));
    assert!(!items.iter().any(|i| i == "FRN-01"));

    let actual = InspeccionRepository::new(pool)
        .find_by_id(inspeccion.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(actual.estado, EstadoInspeccion::EnProgreso);
    assert!(actual.puntaje.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_finalizar_guarda_puntaje_y_resultado(pool: PgPool) {
    let inspector = crear_usuario(&pool, Rol::Inspector).await;
    let empresa = crear_empresa(&pool, "76086428-5").await;
    let camion = crear_camion(&pool, &empresa, "BBCD12").await;
    let inspeccion = crear_inspeccion(&pool, &camion, Some(&inspector), EstadoInspeccion::EnProgreso).await;
    let (app, state) = build_db_app(pool.clone());
    let cookie = cookie_de_usuario(&state, &inspector);

    // una falla crítica: 100 - 30
    let (status, _, body) = send(
        &app,
        json_request(
            "PUT",
            &uri(inspeccion.id, "respuestas"),
            Some(&cookie),
            checklist_con_fallas(&["FRN-01"]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["faltantes"], 0);

    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            &uri(inspeccion.id, "finalizar"),
            Some(&cookie),
            json!({ "observaciones": "  cambio de pastillas pendiente  " }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["evaluacion"]["puntaje"], 70);
    assert_eq!(body["data"]["evaluacion"]["resultado"], "OBSERVACION");

    let guardada = InspeccionRepository::new(pool)
        .find_by_id(inspeccion.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(guardada.estado, EstadoInspeccion::Completada);
    assert_eq!(guardada.puntaje, Some(70));
    assert_eq!(guardada.resultado.as_deref(), Some("OBSERVACION"));
    assert_eq!(guardada.observaciones.as_deref(), Some("cambio de pastillas pendiente"));
    assert!(guardada.fecha_realizada.is_some());

    // una segunda finalización ya no aplica
    let (status, _, _) = send(
        &app,
        json_request("POST", &uri(inspeccion.id, "finalizar"), Some(&cookie), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_respuesta_repetida_sobrescribe(pool: PgPool) {
    let inspector = crear_usuario(&pool, Rol::Inspector).await;
    let empresa = crear_empresa(&pool, "76086428-5").await;
    let camion = crear_camion(&pool, &empresa, "BBCD12").await;
    let inspeccion = crear_inspeccion(&pool, &camion, Some(&inspector), EstadoInspeccion::EnProgreso).await;
    let (app, state) = build_db_app(pool.clone());
    let cookie = cookie_de_usuario(&state, &inspector);

    for respuesta in [
        RespuestaItemRequest {
            item_codigo: "LUC-01".to_string(),
            estado: EstadoRespuesta::NoCumple,
            descripcion_falla: Some("foco roto".to_string()),
        },
        RespuestaItemRequest {
            item_codigo: "luc-01".to_string(),
            estado: EstadoRespuesta::Cumple,
            descripcion_falla: None,
        },
    ] {
        let (status, _, _) = send(
            &app,
            json_request(
                "PUT",
                &uri(inspeccion.id, "respuestas"),
                Some(&cookie),
                json!({ "respuestas": [respuesta] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let detalles = InspeccionRepository::new(pool).detalles(inspeccion.id).await.unwrap();
    assert_eq!(detalles.len(), 1);
    assert_eq!(detalles[0].item_codigo, "LUC-01");
    assert_eq!(detalles[0].estado, EstadoRespuesta::Cumple);
    assert!(detalles[0].descripcion_falla.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_escrituras_tras_el_cierre_son_conflicto(pool: PgPool) {
    let empresa = crear_empresa(&pool, "76086428-5").await;
    let camion = crear_camion(&pool, &empresa, "BBCD12").await;
    let cerrada = crear_inspeccion(&pool, &camion, None, EstadoInspeccion::Completada).await;

    let respuestas = vec![RespuestaDetalle {
        item_codigo: "FRN-01".to_string(),
        nivel: NivelSeveridad::Critico,
        estado: EstadoRespuesta::NoCumple,
        descripcion_falla: Some("tarde".to_string()),
    }];
    let err = InspeccionRepository::new(pool.clone())
        .guardar_respuestas(cerrada.id, &respuestas)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = FotoRepository::new(pool.clone())
        .create(&NuevaFoto {
            inspeccion_id: cerrada.id,
            detalle_id: None,
            url: None,
            public_id: None,
            datos: Some(vec![0x89, b'P', b'N', b'G']),
            content_type: "image/png".to_string(),
            tamano_bytes: 4,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let (detalles, fotos): (i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM detalle_inspeccion), (SELECT COUNT(*) FROM fotos_inspeccion)",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((detalles, fotos), (0, 0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_una_sola_inspeccion_abierta_por_camion(pool: PgPool) {
    let empresa = crear_empresa(&pool, "76086428-5").await;
    let camion = crear_camion(&pool, &empresa, "BBCD12").await;
    let repo = InspeccionRepository::new(pool.clone());
    let primera = crear_inspeccion(&pool, &camion, None, EstadoInspeccion::Programada).await;

    // la restricción vale aunque se salte la verificación previa del controller
    let err = repo
        .create(camion.id, None, Utc::now() + Duration::days(2), None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(ref e) if is_unique_violation(e)));

    repo.cambiar_estado(primera.id, EstadoInspeccion::Programada, EstadoInspeccion::Cancelada)
        .await
        .unwrap()
        .unwrap();
    assert!(repo
        .create(camion.id, None, Utc::now() + Duration::days(2), None, false)
        .await
        .is_ok());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_programar_camion_con_inspeccion_pendiente_es_409(pool: PgPool) {
    let operador = crear_usuario(&pool, Rol::Operador).await;
    let empresa = crear_empresa(&pool, "76086428-5").await;
    let camion = crear_camion(&pool, &empresa, "BBCD12").await;
    let (app, state) = build_db_app(pool.clone());
    let cookie = cookie_de_usuario(&state, &operador);

    let programar = || {
        json_request(
            "POST",
            "/api/admin/inspecciones",
            Some(&cookie),
            json!({
                "camion_id": camion.id,
                "fecha_programada": (Utc::now() + Duration::days(3)).to_rfc3339(),
            }),
        )
    };

    let (status, _, _) = send(&app, programar()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(&app, programar()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("BBCD12"));

    let (abiertas,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM inspecciones WHERE camion_id = $1")
        .bind(camion.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(abiertas, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_observaciones_demasiado_largas_es_400(pool: PgPool) {
    let operador = crear_usuario(&pool, Rol::Operador).await;
    let (app, state) = build_db_app(pool);
    let cookie = cookie_de_usuario(&state, &operador);

    let request = json_request(
        "POST",
        "/api/admin/inspecciones",
        Some(&cookie),
        json!({
            "camion_id": Uuid::new_v4(),
            "fecha_programada": (Utc::now() + Duration::days(1)).to_rfc3339(),
            "observaciones": "x".repeat(2001),
        }),
    );
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"].get("observaciones").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reprogramar_en_progreso_es_409(pool: PgPool) {
    let admin = crear_usuario(&pool, Rol::Admin).await;
    let empresa = crear_empresa(&pool, "76086428-5").await;
    let camion = crear_camion(&pool, &empresa, "BBCD12").await;
    let inspeccion = crear_inspeccion(&pool, &camion, None, EstadoInspeccion::EnProgreso).await;
    let (app, state) = build_db_app(pool.clone());
    let cookie = cookie_de_usuario(&state, &admin);

    let nueva_fecha = Utc::now() + Duration::days(5);
    let (status, _, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/admin/inspecciones/{}/programacion", inspeccion.id),
            Some(&cookie),
            json!({ "fecha_programada": nueva_fecha.to_rfc3339() }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let actual = InspeccionRepository::new(pool)
        .find_by_id(inspeccion.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(actual.fecha_programada, inspeccion.fecha_programada);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reprogramar_sin_cambios_es_400(pool: PgPool) {
    let admin = crear_usuario(&pool, Rol::Admin).await;
    let (app, state) = build_db_app(pool);
    let cookie = cookie_de_usuario(&state, &admin);

    let uri = format!("/api/admin/inspecciones/{}/programacion", Uuid::new_v4());
    let (status, _, _) = send(&app, json_request("PUT", &uri, Some(&cookie), json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_programar_en_el_pasado_es_400(pool: PgPool) {
    let operador = crear_usuario(&pool, Rol::Operador).await;
    let (app, state) = build_db_app(pool);
    let cookie = cookie_de_usuario(&state, &operador);

    let request = json_request(
        "POST",
        "/api/admin/inspecciones",
        Some(&cookie),
        json!({
            "camion_id": Uuid::new_v4(),
            "fecha_programada": (Utc::now() - Duration::days(1)).to_rfc3339(),
        }),
    );
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_filtro_estado_desconocido_es_400(pool: PgPool) {
    let operador = crear_usuario(&pool, Rol::Operador).await;
    let (app, state) = build_db_app(pool);
    let cookie = cookie_de_usuario(&state, &operador);

    let (status, _, body) = send(
        &app,
        get_request("/api/admin/inspecciones?estado=TERMINADA", Some(&cookie)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("TERMINADA"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_respuestas_vacias_es_400(pool: PgPool) {
    let inspector = crear_usuario(&pool, Rol::Inspector).await;
    let (app, state) = build_db_app(pool);
    let cookie = cookie_de_usuario(&state, &inspector);

    let (status, _, _) = send(
        &app,
        json_request(
            "PUT",
            &uri(Uuid::new_v4(), "respuestas"),
            Some(&cookie),
            json!({ "respuestas": [] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_foto_demasiado_grande_es_413(pool: PgPool) {
    let inspector = crear_usuario(&pool, Rol::Inspector).await;
    let empresa = crear_empresa(&pool, "76086428-5").await;
    let camion = crear_camion(&pool, &empresa, "BBCD12").await;
    let inspeccion = crear_inspeccion(&pool, &camion, Some(&inspector), EstadoInspeccion::EnProgreso).await;
    let (app, state) = build_db_app(pool);
    let cookie = cookie_de_usuario(&state, &inspector);

    let enorme = "A".repeat(200 * 1024);
    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            &uri(inspeccion.id, "fotos"),
            Some(&cookie),
            json!({ "imagen_base64": enorme, "content_type": "image/png" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_inspector_no_toca_inspeccion_ajena(pool: PgPool) {
    let asignado = crear_usuario(&pool, Rol::Inspector).await;
    let otro = crear_usuario(&pool, Rol::Inspector).await;
    let empresa = crear_empresa(&pool, "76086428-5").await;
    let camion = crear_camion(&pool, &empresa, "BBCD12").await;
    let inspeccion = crear_inspeccion(&pool, &camion, Some(&asignado), EstadoInspeccion::Programada).await;
    let (app, state) = build_db_app(pool);

    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            &uri(inspeccion.id, "iniciar"),
            Some(&cookie_de_usuario(&state, &otro)),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            &uri(inspeccion.id, "iniciar"),
            Some(&cookie_de_usuario(&state, &asignado)),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["estado"], "EN_PROGRESO");
}
