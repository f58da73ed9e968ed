use crate::dto::admin_dto::CamionFilters;
use crate::models::camion::{Camion, CamionConEmpresa, NuevoCamion, Proveedor};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct CamionRepository {
    pool: PgPool,
}

impl CamionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_proveedor_by_empresa(&self, empresa_id: Uuid) -> Result<Option<Proveedor>, AppError> {
        let result = sqlx::query_as::<_, Proveedor>("SELECT * FROM proveedores WHERE empresa_id = $1")
            .bind(empresa_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    /// Registrar camiones en la flota de una empresa, todo o nada
    ///
    /// Crea el proveedor de la empresa si todavía no existe. Si alguna patente
    /// ya está registrada para el proveedor se devuelve Conflict con la lista.
    pub async fn registrar_flota(
        &self,
        empresa_id: Uuid,
        nombre_proveedor: &str,
        camiones: &[NuevoCamion],
    ) -> Result<(Proveedor, Vec<Camion>), AppError> {
        let mut tx = self.pool.begin().await?;

        let proveedor = sqlx::query_as::<_, Proveedor>(
            r#"
            INSERT INTO proveedores (id, empresa_id, nombre, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (empresa_id) DO UPDATE SET nombre = proveedores.nombre
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(empresa_id)
        .bind(nombre_proveedor)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let patentes: Vec<String> = camiones.iter().map(|c| c.patente.clone()).collect();
        let existentes: Vec<(String,)> = sqlx::query_as(
            "SELECT patente FROM camiones WHERE proveedor_id = $1 AND patente = ANY($2) ORDER BY patente",
        )
        .bind(proveedor.id)
        .bind(&patentes)
        .fetch_all(&mut *tx)
        .await?;

        if !existentes.is_empty() {
            let lista: Vec<String> = existentes.into_iter().map(|(p,)| p).collect();
            return Err(AppError::Conflict(format!(
                "Patentes ya registradas: {}",
                lista.join(", ")
            )));
        }

        let mut creados = Vec::with_capacity(camiones.len());
        for camion in camiones {
            let creado = sqlx::query_as::<_, Camion>(
                r#"
                INSERT INTO camiones (id, proveedor_id, patente, marca, modelo, anio, carroceria, activo, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(proveedor.id)
            .bind(&camion.patente)
            .bind(&camion.marca)
            .bind(&camion.modelo)
            .bind(camion.anio)
            .bind(&camion.carroceria)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;
            creados.push(creado);
        }

        tx.commit().await?;
        Ok((proveedor, creados))
    }

    pub async fn list_by_empresa(&self, empresa_id: Uuid) -> Result<Vec<Camion>, AppError> {
        let result = sqlx::query_as::<_, Camion>(
            r#"
            SELECT c.* FROM camiones c
            JOIN proveedores p ON p.id = c.proveedor_id
            WHERE p.empresa_id = $1
            ORDER BY c.patente
            "#,
        )
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Camion>, AppError> {
        let result = sqlx::query_as::<_, Camion>("SELECT * FROM camiones WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    /// Empresa dueña de un camión
    pub async fn find_empresa_id(&self, camion_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let result: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT p.empresa_id FROM camiones c
            JOIN proveedores p ON p.id = c.proveedor_id
            WHERE c.id = $1
            "#,
        )
        .bind(camion_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.map(|(id,)| id))
    }

    pub async fn list_admin(&self, filters: &CamionFilters) -> Result<Vec<CamionConEmpresa>, AppError> {
        let patente = filters.patente.as_ref().map(|p| format!("%{}%", p.trim().to_uppercase()));

        let result = sqlx::query_as::<_, CamionConEmpresa>(
            r#"
            SELECT c.id, c.patente, c.marca, c.modelo, c.anio, c.carroceria, c.activo,
                   e.id AS empresa_id, e.nombre AS empresa_nombre
            FROM camiones c
            JOIN proveedores p ON p.id = c.proveedor_id
            JOIN empresas e ON e.id = p.empresa_id
            WHERE ($1::UUID IS NULL OR e.id = $1)
            AND ($2::TEXT IS NULL OR c.patente LIKE $2)
            ORDER BY e.nombre, c.patente
            "#,
        )
        .bind(filters.empresa_id)
        .bind(patente)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn count_activos(&self) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM camiones WHERE activo")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
