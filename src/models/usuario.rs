//! Modelo de Usuario (staff)
//!
//! Cuentas de administración, operación e inspección.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Rol de un usuario staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Admin,
    Operador,
    Inspector,
}

impl Rol {
    pub fn as_str(self) -> &'static str {
        match self {
            Rol::Admin => "admin",
            Rol::Operador => "operador",
            Rol::Inspector => "inspector",
        }
    }

    /// Puede gestionar la agenda de inspecciones
    pub fn gestiona_agenda(self) -> bool {
        matches!(self, Rol::Admin | Rol::Operador)
    }

    /// Puede ejecutar inspecciones
    pub fn inspecciona(self) -> bool {
        matches!(self, Rol::Admin | Rol::Inspector)
    }
}

impl FromStr for Rol {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Rol::Admin),
            "operador" => Ok(Rol::Operador),
            "inspector" => Ok(Rol::Inspector),
            other => Err(format!("rol desconocido: {}", other)),
        }
    }
}

impl TryFrom<String> for Rol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usuario - mapea a la tabla usuarios
#[derive(Debug, Clone, FromRow)]
pub struct Usuario {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub rol: Rol,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response de usuario para la API (sin hash)
#[derive(Debug, Clone, Serialize)]
pub struct UsuarioResponse {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    pub rol: Rol,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Usuario> for UsuarioResponse {
    fn from(usuario: Usuario) -> Self {
        Self {
            id: usuario.id,
            nombre: usuario.nombre,
            email: usuario.email,
            rol: usuario.rol,
            activo: usuario.activo,
            created_at: usuario.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rol_permisos() {
        assert!(Rol::Admin.gestiona_agenda() && Rol::Admin.inspecciona());
        assert!(Rol::Operador.gestiona_agenda() && !Rol::Operador.inspecciona());
        assert!(!Rol::Inspector.gestiona_agenda() && Rol::Inspector.inspecciona());
    }

    #[test]
    fn test_rol_round_trip_str() {
        for rol in [Rol::Admin, Rol::Operador, Rol::Inspector] {
            assert_eq!(rol.as_str().parse::<Rol>(), Ok(rol));
        }
        assert!("supervisor".parse::<Rol>().is_err());
    }
}
