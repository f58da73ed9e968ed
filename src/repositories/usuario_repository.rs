use crate::dto::admin_dto::UsuarioFilters;
use crate::models::usuario::{Rol, Usuario};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        nombre: &str,
        email: &str,
        password_hash: &str,
        rol: Rol,
    ) -> Result<Usuario, AppError> {
        let now = Utc::now();
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (id, nombre, email, password_hash, rol, activo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nombre)
        .bind(email)
        .bind(password_hash)
        .bind(rol.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(usuario)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(usuario)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(usuario)
    }

    pub async fn list(&self, filters: &UsuarioFilters) -> Result<Vec<Usuario>, AppError> {
        let usuarios = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT * FROM usuarios
            WHERE ($1::TEXT IS NULL OR rol = $1)
            AND ($2 OR activo)
            ORDER BY nombre
            "#,
        )
        .bind(filters.rol.map(Rol::as_str))
        .bind(filters.incluir_inactivos.unwrap_or(false))
        .fetch_all(&self.pool)
        .await?;

        Ok(usuarios)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        nombre: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
        rol: Option<Rol>,
        activo: Option<bool>,
    ) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios
            SET nombre = COALESCE($2, nombre),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                rol = COALESCE($5, rol),
                activo = COALESCE($6, activo),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nombre)
        .bind(email)
        .bind(password_hash)
        .bind(rol.map(Rol::as_str))
        .bind(activo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(usuario)
    }

    /// Baja lógica del usuario
    pub async fn desactivar(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE usuarios SET activo = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
