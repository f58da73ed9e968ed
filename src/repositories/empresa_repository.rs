use crate::dto::admin_dto::{ActualizarEmpresaRequest, EmpresaFilters};
use crate::models::empresa::{Empresa, NuevaEmpresa};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct EmpresaRepository {
    pool: PgPool,
}

impl EmpresaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, empresa: &NuevaEmpresa) -> Result<Empresa, AppError> {
        let now = Utc::now();
        let result = sqlx::query_as::<_, Empresa>(
            r#"
            INSERT INTO empresas (
                id, nombre, rut, giro, direccion, contacto_nombre, contacto_email,
                contacto_telefono, pin_hash, prioridad_alta, inspeccion_mensual,
                activa, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE, $12, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&empresa.nombre)
        .bind(&empresa.rut)
        .bind(&empresa.giro)
        .bind(&empresa.direccion)
        .bind(&empresa.contacto_nombre)
        .bind(&empresa.contacto_email)
        .bind(&empresa.contacto_telefono)
        .bind(&empresa.pin_hash)
        .bind(empresa.prioridad_alta)
        .bind(empresa.inspeccion_mensual)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Empresa>, AppError> {
        let result = sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn find_by_rut(&self, rut: &str) -> Result<Option<Empresa>, AppError> {
        let result = sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE rut = $1")
            .bind(rut)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn rut_exists(&self, rut: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM empresas WHERE rut = $1)")
            .bind(rut)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn list(&self, filters: &EmpresaFilters) -> Result<Vec<Empresa>, AppError> {
        let busqueda = filters
            .busqueda
            .as_ref()
            .map(|b| format!("%{}%", b.trim()))
            .filter(|b| b.len() > 2);

        let result = sqlx::query_as::<_, Empresa>(
            r#"
            SELECT * FROM empresas
            WHERE ($1::TEXT IS NULL OR nombre ILIKE $1 OR rut ILIKE $1)
            AND ($2 OR activa)
            ORDER BY prioridad_alta DESC, nombre ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(busqueda)
        .bind(filters.incluir_inactivas.unwrap_or(false))
        .bind(filters.limit.unwrap_or(50).clamp(1, 200))
        .bind(filters.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn update(
        &self,
        id: Uuid,
        cambios: &ActualizarEmpresaRequest,
    ) -> Result<Option<Empresa>, AppError> {
        let result = sqlx::query_as::<_, Empresa>(
            r#"
            UPDATE empresas
            SET nombre = COALESCE($2, nombre),
                giro = COALESCE($3, giro),
                direccion = COALESCE($4, direccion),
                contacto_nombre = COALESCE($5, contacto_nombre),
                contacto_email = COALESCE($6, contacto_email),
                contacto_telefono = COALESCE($7, contacto_telefono),
                prioridad_alta = COALESCE($8, prioridad_alta),
                inspeccion_mensual = COALESCE($9, inspeccion_mensual),
                activa = COALESCE($10, activa),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&cambios.nombre)
        .bind(&cambios.giro)
        .bind(&cambios.direccion)
        .bind(&cambios.contacto_nombre)
        .bind(&cambios.contacto_email)
        .bind(&cambios.contacto_telefono)
        .bind(cambios.prioridad_alta)
        .bind(cambios.inspeccion_mensual)
        .bind(cambios.activa)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn update_pin(&self, id: Uuid, pin_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE empresas SET pin_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(pin_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Baja lógica: la empresa deja de poder iniciar sesión
    pub async fn desactivar(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE empresas SET activa = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn count_activas(&self) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM empresas WHERE activa")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
