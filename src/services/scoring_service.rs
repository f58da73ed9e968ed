//! Servicio de puntaje de inspecciones
//!
//! Convierte las respuestas del checklist en un puntaje 0-100 y un resultado.
//! Es la única implementación del cálculo; controladores y reportes la usan
//! directamente.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::models::checklist::{ChecklistItem, EstadoRespuesta, NivelSeveridad};
use crate::models::inspeccion::ResultadoInspeccion;

pub const PUNTAJE_MAXIMO: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("faltan {faltantes} ítems por responder")]
    Incompleto {
        faltantes: usize,
        codigos: Vec<String>,
    },

    #[error("ítem desconocido: {0}")]
    ItemDesconocido(String),
}

/// Resultado de evaluar un checklist completo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluacion {
    pub puntaje: u8,
    pub resultado: ResultadoInspeccion,
    /// Fallas por nivel, índice 0 = nivel 1
    pub fallas_por_nivel: [u32; 4],
    pub items_cumple: u32,
    pub items_no_aplica: u32,
}

impl Evaluacion {
    pub fn total_fallas(&self) -> u32 {
        self.fallas_por_nivel.iter().sum()
    }
}

/// Puntaje a partir de pares (nivel, estado)
///
/// Parte en 100, descuenta por cada `no_cumple` según su nivel y no baja de 0.
/// `no_aplica` y `cumple` no descuentan.
pub fn calcular_puntaje<I>(respuestas: I) -> u8
where
    I: IntoIterator<Item = (NivelSeveridad, EstadoRespuesta)>,
{
    let descuento: u32 = respuestas
        .into_iter()
        .filter(|(_, estado)| *estado == EstadoRespuesta::NoCumple)
        .map(|(nivel, _)| nivel.penalizacion())
        .sum();

    u32::from(PUNTAJE_MAXIMO).saturating_sub(descuento) as u8
}

/// Evaluar un checklist contra el catálogo
///
/// Rechaza respuestas incompletas antes de calcular nada, informando cuántos
/// ítems faltan y cuáles.
pub fn evaluar(
    catalogo: &[ChecklistItem],
    respuestas: &HashMap<String, EstadoRespuesta>,
) -> Result<Evaluacion, ScoringError> {
    if let Some(desconocido) = respuestas
        .keys()
        .find(|codigo| !catalogo.iter().any(|item| item.codigo == codigo.as_str()))
    {
        return Err(ScoringError::ItemDesconocido(desconocido.clone()));
    }

    let faltantes: Vec<String> = catalogo
        .iter()
        .filter(|item| !respuestas.contains_key(item.codigo))
        .map(|item| item.codigo.to_string())
        .collect();

    if !faltantes.is_empty() {
        return Err(ScoringError::Incompleto {
            faltantes: faltantes.len(),
            codigos: faltantes,
        });
    }

    let mut fallas_por_nivel = [0u32; 4];
    let mut items_cumple = 0;
    let mut items_no_aplica = 0;
    let mut pares = Vec::with_capacity(catalogo.len());

    for item in catalogo {
        let estado = respuestas[item.codigo];
        match estado {
            EstadoRespuesta::Cumple => items_cumple += 1,
            EstadoRespuesta::NoAplica => items_no_aplica += 1,
            EstadoRespuesta::NoCumple => fallas_por_nivel[item.nivel as usize - 1] += 1,
        }
        pares.push((item.nivel, estado));
    }

    let puntaje = calcular_puntaje(pares);
    Ok(Evaluacion {
        puntaje,
        resultado: ResultadoInspeccion::desde_puntaje(puntaje),
        fallas_por_nivel,
        items_cumple,
        items_no_aplica,
    })
}
