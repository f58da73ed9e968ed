use crate::models::foto::{FotoContenido, FotoInspeccion, NuevaFoto};
use crate::repositories::inspeccion_repository::bloquear_inspeccion;
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct FotoRepository {
    pool: PgPool,
}

impl FotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registrar una foto; la inspección debe seguir EN_PROGRESO al insertar
    pub async fn create(&self, foto: &NuevaFoto) -> Result<FotoInspeccion, AppError> {
        let mut tx = self.pool.begin().await?;
        bloquear_inspeccion(&mut *tx, foto.inspeccion_id).await?.exigir_en_progreso()?;

        let result = sqlx::query_as::<_, FotoInspeccion>(
            r#"
            INSERT INTO fotos_inspeccion (
                id, inspeccion_id, detalle_id, url, public_id, datos, content_type, tamano_bytes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            RETURNING id, inspeccion_id, detalle_id, url, public_id, content_type, tamano_bytes, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(foto.inspeccion_id)
        .bind(foto.detalle_id)
        .bind(&foto.url)
        .bind(&foto.public_id)
        .bind(&foto.datos)
        .bind(&foto.content_type)
        .bind(foto.tamano_bytes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result)
    }

    /// Metadatos de las fotos de una inspección, sin los bytes
    pub async fn list_by_inspeccion(&self, inspeccion_id: Uuid) -> Result<Vec<FotoInspeccion>, AppError> {
        let result = sqlx::query_as::<_, FotoInspeccion>(
            r#"
            SELECT id, inspeccion_id, detalle_id, url, public_id, content_type, tamano_bytes, created_at
            FROM fotos_inspeccion
            WHERE inspeccion_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(inspeccion_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_contenido(&self, id: Uuid) -> Result<Option<FotoContenido>, AppError> {
        let result = sqlx::query_as::<_, FotoContenido>(
            "SELECT id, inspeccion_id, url, datos, content_type FROM fotos_inspeccion WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }
}
