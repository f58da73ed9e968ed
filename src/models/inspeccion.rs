//! Modelo de Inspección
//!
//! Estados de inspección, resultado de la evaluación y las filas de
//! `inspecciones` y `detalle_inspeccion`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::checklist::{EstadoRespuesta, NivelSeveridad};

/// Estado de una inspección
///
/// Único vocabulario de estados del sistema. El valor histórico `REALIZADA`
/// se lee como `Completada` y nunca se escribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoInspeccion {
    Programada,
    EnProgreso,
    Completada,
    Cancelada,
}

impl EstadoInspeccion {
    pub const TODOS: [EstadoInspeccion; 4] = [
        EstadoInspeccion::Programada,
        EstadoInspeccion::EnProgreso,
        EstadoInspeccion::Completada,
        EstadoInspeccion::Cancelada,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EstadoInspeccion::Programada => "PROGRAMADA",
            EstadoInspeccion::EnProgreso => "EN_PROGRESO",
            EstadoInspeccion::Completada => "COMPLETADA",
            EstadoInspeccion::Cancelada => "CANCELADA",
        }
    }

    /// Transiciones permitidas
    pub fn puede_pasar_a(self, destino: EstadoInspeccion) -> bool {
        use EstadoInspeccion::*;
        matches!(
            (self, destino),
            (Programada, EnProgreso)
                | (Programada, Cancelada)
                | (EnProgreso, Cancelada)
                | (EnProgreso, Completada)
        )
    }

    /// Inspección aún pendiente de realizar
    pub fn esta_abierta(self) -> bool {
        matches!(self, EstadoInspeccion::Programada | EstadoInspeccion::EnProgreso)
    }

    /// Estados que cuentan como abiertos, para filtros SQL
    pub fn abiertos() -> Vec<String> {
        Self::TODOS
            .iter()
            .filter(|e| e.esta_abierta())
            .map(|e| e.as_str().to_string())
            .collect()
    }
}

impl FromStr for EstadoInspeccion {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "PROGRAMADA" => Ok(EstadoInspeccion::Programada),
            "EN_PROGRESO" => Ok(EstadoInspeccion::EnProgreso),
            "COMPLETADA" | "REALIZADA" => Ok(EstadoInspeccion::Completada),
            "CANCELADA" => Ok(EstadoInspeccion::Cancelada),
            other => Err(format!("estado de inspección desconocido: {}", other)),
        }
    }
}

impl TryFrom<String> for EstadoInspeccion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for EstadoInspeccion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resultado de una inspección completada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultadoInspeccion {
    Aprobada,
    Observacion,
    Rechazada,
}

impl ResultadoInspeccion {
    pub const UMBRAL_APROBADA: u8 = 80;
    pub const UMBRAL_OBSERVACION: u8 = 60;

    /// Clasificar un puntaje 0-100
    pub fn desde_puntaje(puntaje: u8) -> Self {
        if puntaje >= Self::UMBRAL_APROBADA {
            ResultadoInspeccion::Aprobada
        } else if puntaje >= Self::UMBRAL_OBSERVACION {
            ResultadoInspeccion::Observacion
        } else {
            ResultadoInspeccion::Rechazada
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResultadoInspeccion::Aprobada => "APROBADA",
            ResultadoInspeccion::Observacion => "OBSERVACION",
            ResultadoInspeccion::Rechazada => "RECHAZADA",
        }
    }
}

impl TryFrom<String> for ResultadoInspeccion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "APROBADA" => Ok(ResultadoInspeccion::Aprobada),
            "OBSERVACION" => Ok(ResultadoInspeccion::Observacion),
            "RECHAZADA" => Ok(ResultadoInspeccion::Rechazada),
            other => Err(format!("resultado desconocido: {}", other)),
        }
    }
}

impl fmt::Display for ResultadoInspeccion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inspección - mapea a la tabla inspecciones
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Inspeccion {
    pub id: Uuid,
    pub camion_id: Uuid,
    pub inspector_id: Option<Uuid>,
    pub fecha_programada: DateTime<Utc>,
    pub fecha_inicio: Option<DateTime<Utc>>,
    pub fecha_realizada: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub estado: EstadoInspeccion,
    pub resultado: Option<String>,
    pub puntaje: Option<i32>,
    pub observaciones: Option<String>,
    pub solicitada_por_cliente: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inspeccion {
    /// Validar y devolver el error de transición si no corresponde
    pub fn verificar_transicion(
        &self,
        destino: EstadoInspeccion,
    ) -> Result<(), crate::utils::errors::AppError> {
        if self.estado.puede_pasar_a(destino) {
            Ok(())
        } else {
            Err(crate::utils::errors::AppError::TransicionInvalida {
                desde: self.estado,
                hacia: destino,
            })
        }
    }

    /// Respuestas y fotos solo se aceptan con la inspección en curso
    pub fn exigir_en_progreso(&self) -> Result<(), crate::utils::errors::AppError> {
        if self.estado != EstadoInspeccion::EnProgreso {
            return Err(crate::utils::errors::AppError::Conflict(format!(
                "La inspección debe estar EN_PROGRESO (actual: {})",
                self.estado
            )));
        }
        Ok(())
    }
}

/// Inspección con datos del camión y la empresa, para listados
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InspeccionResumen {
    pub id: Uuid,
    pub camion_id: Uuid,
    pub patente: String,
    pub empresa_id: Uuid,
    pub empresa_nombre: String,
    pub inspector_id: Option<Uuid>,
    pub inspector_nombre: Option<String>,
    pub fecha_programada: DateTime<Utc>,
    pub fecha_realizada: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub estado: EstadoInspeccion,
    pub resultado: Option<String>,
    pub puntaje: Option<i32>,
    pub solicitada_por_cliente: bool,
}

/// Fila de detalle_inspeccion
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DetalleInspeccion {
    pub id: Uuid,
    pub inspeccion_id: Uuid,
    pub item_codigo: String,
    #[sqlx(try_from = "i16")]
    pub nivel: NivelSeveridad,
    #[sqlx(try_from = "String")]
    pub estado: EstadoRespuesta,
    pub descripcion_falla: Option<String>,
    pub updated_at: DateTime<Utc>,
}
