use crate::dto::inspeccion_dto::AgendaFilters;
use crate::models::checklist::{EstadoRespuesta, NivelSeveridad};
use crate::models::inspeccion::{
    DetalleInspeccion, EstadoInspeccion, Inspeccion, InspeccionResumen,
};
use crate::services::scoring_service::Evaluacion;
use crate::utils::errors::AppError;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const SELECT_RESUMEN: &str = r#"
    SELECT i.id, i.camion_id, c.patente, e.id AS empresa_id, e.nombre AS empresa_nombre,
           i.inspector_id, u.nombre AS inspector_nombre, i.fecha_programada, i.fecha_realizada,
           i.estado, i.resultado, i.puntaje, i.solicitada_por_cliente
    FROM inspecciones i
    JOIN camiones c ON c.id = i.camion_id
    JOIN proveedores p ON p.id = c.proveedor_id
    JOIN empresas e ON e.id = p.empresa_id
    LEFT JOIN usuarios u ON u.id = i.inspector_id
"#;

/// Respuesta lista para persistir
#[derive(Debug, Clone)]
pub struct RespuestaDetalle {
    pub item_codigo: String,
    pub nivel: NivelSeveridad,
    pub estado: EstadoRespuesta,
    pub descripcion_falla: Option<String>,
}

/// Valores de estado guardados en la tabla para un estado de dominio
fn valores_estado(estado: EstadoInspeccion) -> Vec<String> {
    match estado {
        EstadoInspeccion::Completada => vec!["COMPLETADA".to_string(), "REALIZADA".to_string()],
        otro => vec![otro.as_str().to_string()],
    }
}

/// Bloquear la fila de la inspección hasta el fin de la transacción
///
/// Finalizar, guardar respuestas y registrar fotos toman este mismo bloqueo,
/// así que una escritura nunca se cuela después del cierre.
pub(crate) async fn bloquear_inspeccion(conn: &mut PgConnection, id: Uuid) -> Result<Inspeccion, AppError> {
    sqlx::query_as::<_, Inspeccion>("SELECT * FROM inspecciones WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Inspección no encontrada".to_string()))
}

pub struct InspeccionRepository {
    pool: PgPool,
}

impl InspeccionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        camion_id: Uuid,
        inspector_id: Option<Uuid>,
        fecha_programada: DateTime<Utc>,
        observaciones: Option<&str>,
        solicitada_por_cliente: bool,
    ) -> Result<Inspeccion, AppError> {
        let now = Utc::now();
        let inspeccion = sqlx::query_as::<_, Inspeccion>(
            r#"
            INSERT INTO inspecciones (
                id, camion_id, inspector_id, fecha_programada, estado, observaciones,
                solicitada_por_cliente, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(camion_id)
        .bind(inspector_id)
        .bind(fecha_programada)
        .bind(EstadoInspeccion::Programada.as_str())
        .bind(observaciones)
        .bind(solicitada_por_cliente)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(inspeccion)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Inspeccion>, AppError> {
        let inspeccion = sqlx::query_as::<_, Inspeccion>("SELECT * FROM inspecciones WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(inspeccion)
    }

    /// ¿El camión ya tiene una inspección abierta?
    pub async fn camion_tiene_abierta(&self, camion_id: Uuid, excluir: Option<Uuid>) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM inspecciones
                WHERE camion_id = $1 AND estado = ANY($2)
                AND ($3::UUID IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(camion_id)
        .bind(EstadoInspeccion::abiertos())
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// ¿El inspector tiene otra inspección abierta dentro de la ventana?
    pub async fn inspector_ocupado(
        &self,
        inspector_id: Uuid,
        fecha: DateTime<Utc>,
        ventana: Duration,
        excluir: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM inspecciones
                WHERE inspector_id = $1 AND estado = ANY($2)
                AND fecha_programada > $3 AND fecha_programada < $4
                AND ($5::UUID IS NULL OR id <> $5)
            )
            "#,
        )
        .bind(inspector_id)
        .bind(EstadoInspeccion::abiertos())
        .bind(fecha - ventana)
        .bind(fecha + ventana)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn list_resumen(
        &self,
        filters: &AgendaFilters,
        estado: Option<EstadoInspeccion>,
    ) -> Result<Vec<InspeccionResumen>, AppError> {
        let sql = format!(
            r#"{}
            WHERE ($1::TEXT[] IS NULL OR i.estado = ANY($1))
            AND ($2::TIMESTAMPTZ IS NULL OR i.fecha_programada >= $2)
            AND ($3::TIMESTAMPTZ IS NULL OR i.fecha_programada < $3)
            AND ($4::UUID IS NULL OR i.inspector_id = $4)
            AND ($5::UUID IS NULL OR e.id = $5)
            ORDER BY e.prioridad_alta DESC, i.fecha_programada ASC
            LIMIT $6 OFFSET $7
            "#,
            SELECT_RESUMEN
        );

        let result = sqlx::query_as::<_, InspeccionResumen>(&sql)
            .bind(estado.map(valores_estado))
            .bind(filters.desde)
            .bind(filters.hasta)
            .bind(filters.inspector_id)
            .bind(filters.empresa_id)
            .bind(filters.limit.unwrap_or(100).clamp(1, 500))
            .bind(filters.offset.unwrap_or(0).max(0))
            .fetch_all(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn list_by_empresa(&self, empresa_id: Uuid) -> Result<Vec<InspeccionResumen>, AppError> {
        let sql = format!("{} WHERE e.id = $1 ORDER BY i.fecha_programada DESC", SELECT_RESUMEN);
        let result = sqlx::query_as::<_, InspeccionResumen>(&sql)
            .bind(empresa_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(result)
    }

    /// Inspecciones abiertas asignadas a un inspector
    pub async fn agenda_inspector(&self, inspector_id: Uuid) -> Result<Vec<InspeccionResumen>, AppError> {
        let sql = format!(
            "{} WHERE i.inspector_id = $1 AND i.estado = ANY($2) ORDER BY i.fecha_programada ASC",
            SELECT_RESUMEN
        );
        let result = sqlx::query_as::<_, InspeccionResumen>(&sql)
            .bind(inspector_id)
            .bind(EstadoInspeccion::abiertos())
            .fetch_all(&self.pool)
            .await?;

        Ok(result)
    }

    /// Cambiar fecha y/o inspector de una inspección aún programada
    pub async fn reprogramar(
        &self,
        id: Uuid,
        fecha_programada: Option<DateTime<Utc>>,
        inspector_id: Option<Uuid>,
    ) -> Result<Option<Inspeccion>, AppError> {
        let inspeccion = sqlx::query_as::<_, Inspeccion>(
            r#"
            UPDATE inspecciones
            SET fecha_programada = COALESCE($2, fecha_programada),
                inspector_id = COALESCE($3, inspector_id),
                updated_at = NOW()
            WHERE id = $1 AND estado = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fecha_programada)
        .bind(inspector_id)
        .bind(EstadoInspeccion::Programada.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(inspeccion)
    }

    /// Transición atómica: solo aplica si el estado actual sigue siendo `desde`
    pub async fn cambiar_estado(
        &self,
        id: Uuid,
        desde: EstadoInspeccion,
        hacia: EstadoInspeccion,
    ) -> Result<Option<Inspeccion>, AppError> {
        let inspeccion = sqlx::query_as::<_, Inspeccion>(
            r#"
            UPDATE inspecciones
            SET estado = $3,
                fecha_inicio = CASE WHEN $3 = 'EN_PROGRESO' THEN NOW() ELSE fecha_inicio END,
                updated_at = NOW()
            WHERE id = $1 AND estado = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(desde.as_str())
        .bind(hacia.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(inspeccion)
    }

    /// Upsert de respuestas del checklist en una transacción
    pub async fn guardar_respuestas(
        &self,
        inspeccion_id: Uuid,
        respuestas: &[RespuestaDetalle],
    ) -> Result<Vec<DetalleInspeccion>, AppError> {
        let mut tx = self.pool.begin().await?;
        bloquear_inspeccion(&mut *tx, inspeccion_id).await?.exigir_en_progreso()?;

        let mut guardados = Vec::with_capacity(respuestas.len());

        for respuesta in respuestas {
            let detalle = sqlx::query_as::<_, DetalleInspeccion>(
                r#"
                INSERT INTO detalle_inspeccion (
                    id, inspeccion_id, item_codigo, nivel, estado, descripcion_falla, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
                ON CONFLICT (inspeccion_id, item_codigo) DO UPDATE
                SET estado = EXCLUDED.estado,
                    nivel = EXCLUDED.nivel,
                    descripcion_falla = EXCLUDED.descripcion_falla,
                    updated_at = NOW()
                RETURNING id, inspeccion_id, item_codigo, nivel, estado, descripcion_falla, updated_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(inspeccion_id)
            .bind(&respuesta.item_codigo)
            .bind(respuesta.nivel.as_i16())
            .bind(respuesta.estado.as_str())
            .bind(&respuesta.descripcion_falla)
            .fetch_one(&mut *tx)
            .await?;
            guardados.push(detalle);
        }

        tx.commit().await?;
        Ok(guardados)
    }

    pub async fn detalles(&self, inspeccion_id: Uuid) -> Result<Vec<DetalleInspeccion>, AppError> {
        let detalles = sqlx::query_as::<_, DetalleInspeccion>(
            r#"
            SELECT id, inspeccion_id, item_codigo, nivel, estado, descripcion_falla, updated_at
            FROM detalle_inspeccion
            WHERE inspeccion_id = $1
            ORDER BY item_codigo
            "#,
        )
        .bind(inspeccion_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(detalles)
    }

    pub async fn find_detalle_id(&self, inspeccion_id: Uuid, item_codigo: &str) -> Result<Option<Uuid>, AppError> {
        let result: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM detalle_inspeccion WHERE inspeccion_id = $1 AND item_codigo = $2",
        )
        .bind(inspeccion_id)
        .bind(item_codigo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.map(|(id,)| id))
    }

    /// Finalizar una inspección en curso
    ///
    /// Bloquea la fila, vuelve a leer los detalles dentro de la transacción y
    /// delega la evaluación en `evaluar`; si esta falla no se escribe nada.
    pub async fn finalizar<F>(
        &self,
        id: Uuid,
        observaciones: Option<&str>,
        evaluar: F,
    ) -> Result<(Inspeccion, Evaluacion), AppError>
    where
        F: FnOnce(&Inspeccion, &[DetalleInspeccion]) -> Result<Evaluacion, AppError>,
    {
        let mut tx = self.pool.begin().await?;

        let actual = bloquear_inspeccion(&mut *tx, id).await?;
        actual.verificar_transicion(EstadoInspeccion::Completada)?;

        let detalles = sqlx::query_as::<_, DetalleInspeccion>(
            r#"
            SELECT id, inspeccion_id, item_codigo, nivel, estado, descripcion_falla, updated_at
            FROM detalle_inspeccion WHERE inspeccion_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let evaluacion = evaluar(&actual, &detalles)?;

        let inspeccion = sqlx::query_as::<_, Inspeccion>(
            r#"
            UPDATE inspecciones
            SET estado = $2, resultado = $3, puntaje = $4,
                observaciones = COALESCE($5, observaciones),
                fecha_realizada = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(EstadoInspeccion::Completada.as_str())
        .bind(evaluacion.resultado.as_str())
        .bind(i32::from(evaluacion.puntaje))
        .bind(observaciones)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((inspeccion, evaluacion))
    }

    pub async fn conteo_por_estado(&self) -> Result<Vec<(String, i64)>, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT CASE WHEN estado = 'REALIZADA' THEN 'COMPLETADA' ELSE estado END AS estado_normalizado,
                   COUNT(*)
            FROM inspecciones
            GROUP BY estado_normalizado
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn conteo_por_resultado(&self) -> Result<Vec<(String, i64)>, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT resultado, COUNT(*) FROM inspecciones WHERE resultado IS NOT NULL GROUP BY resultado",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn puntaje_promedio(&self) -> Result<Option<f64>, AppError> {
        let result: (Option<f64>,) =
            sqlx::query_as("SELECT AVG(puntaje)::FLOAT8 FROM inspecciones WHERE puntaje IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valores_estado_incluye_legacy_para_completada() {
        assert_eq!(valores_estado(EstadoInspeccion::Completada), vec!["COMPLETADA", "REALIZADA"]);
        assert_eq!(valores_estado(EstadoInspeccion::Programada), vec!["PROGRAMADA"]);
    }
}
