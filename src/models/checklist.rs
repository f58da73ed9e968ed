//! Modelo del checklist de inspección
//!
//! Catálogo fijo de ítems con su nivel de severidad y los estados posibles
//! de cada respuesta.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Versión del catálogo compilado en el binario
pub const CATALOGO_VERSION: &str = "2024.1";

/// Severidad de un ítem: 1 crítico ... 4 cosmético
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NivelSeveridad {
    Critico = 1,
    Mayor = 2,
    Menor = 3,
    Leve = 4,
}

impl NivelSeveridad {
    pub const TODOS: [NivelSeveridad; 4] = [
        NivelSeveridad::Critico,
        NivelSeveridad::Mayor,
        NivelSeveridad::Menor,
        NivelSeveridad::Leve,
    ];

    /// Puntos descontados por cada ítem `no_cumple` de este nivel
    pub fn penalizacion(self) -> u32 {
        match self {
            NivelSeveridad::Critico => 30,
            NivelSeveridad::Mayor => 15,
            NivelSeveridad::Menor => 7,
            NivelSeveridad::Leve => 2,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl TryFrom<u8> for NivelSeveridad {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NivelSeveridad::Critico),
            2 => Ok(NivelSeveridad::Mayor),
            3 => Ok(NivelSeveridad::Menor),
            4 => Ok(NivelSeveridad::Leve),
            other => Err(format!("nivel de severidad inválido: {}", other)),
        }
    }
}

impl TryFrom<i16> for NivelSeveridad {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| format!("nivel de severidad inválido: {}", value))
            .and_then(NivelSeveridad::try_from)
    }
}

impl From<NivelSeveridad> for u8 {
    fn from(nivel: NivelSeveridad) -> Self {
        nivel as u8
    }
}

/// Estado de respuesta de un ítem del checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstadoRespuesta {
    Cumple,
    NoCumple,
    NoAplica,
}

impl EstadoRespuesta {
    pub fn as_str(self) -> &'static str {
        match self {
            EstadoRespuesta::Cumple => "cumple",
            EstadoRespuesta::NoCumple => "no_cumple",
            EstadoRespuesta::NoAplica => "no_aplica",
        }
    }
}

impl TryFrom<String> for EstadoRespuesta {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "cumple" => Ok(EstadoRespuesta::Cumple),
            "no_cumple" => Ok(EstadoRespuesta::NoCumple),
            "no_aplica" => Ok(EstadoRespuesta::NoAplica),
            other => Err(format!("estado de respuesta inválido: {}", other)),
        }
    }
}

impl fmt::Display for EstadoRespuesta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ítem del catálogo
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItem {
    pub codigo: &'static str,
    pub categoria: &'static str,
    pub descripcion: &'static str,
    pub nivel: NivelSeveridad,
}

const fn item(
    codigo: &'static str,
    categoria: &'static str,
    descripcion: &'static str,
    nivel: NivelSeveridad,
) -> ChecklistItem {
    ChecklistItem {
        codigo,
        categoria,
        descripcion,
        nivel,
    }
}

lazy_static! {
    /// Catálogo de ítems de inspección de camiones
    pub static ref CATALOGO: Vec<ChecklistItem> = {
        use NivelSeveridad::*;
        vec![
            item("FRN-01", "Frenos", "Freno de servicio con eficacia adecuada", Critico),
            item("FRN-02", "Frenos", "Freno de estacionamiento retiene el vehículo", Critico),
            item("FRN-03", "Frenos", "Sistema neumático sin fugas audibles", Mayor),
            item("DIR-01", "Dirección", "Juego de dirección dentro de tolerancia", Critico),
            item("DIR-02", "Dirección", "Terminales y rótulas sin holguras", Mayor),
            item("NEU-01", "Neumáticos", "Profundidad de banda sobre el mínimo legal", Critico),
            item("NEU-02", "Neumáticos", "Neumáticos sin cortes ni deformaciones", Mayor),
            item("NEU-03", "Neumáticos", "Tuercas de rueda completas y apretadas", Mayor),
            item("SUS-01", "Suspensión", "Ballestas y amortiguadores sin roturas", Mayor),
            item("LUC-01", "Luces", "Luces de freno operativas", Mayor),
            item("LUC-02", "Luces", "Luces delanteras y de posición operativas", Menor),
            item("LUC-03", "Luces", "Intermitentes y balizas operativos", Menor),
            item("CAB-01", "Cabina", "Cinturones de seguridad operativos", Mayor),
            item("CAB-02", "Cabina", "Parabrisas sin trizaduras en zona de visión", Menor),
            item("CAB-03", "Cabina", "Espejos retrovisores completos", Menor),
            item("CAB-04", "Cabina", "Bocina operativa", Leve),
            item("SEG-01", "Seguridad", "Extintor vigente y accesible", Mayor),
            item("SEG-02", "Seguridad", "Triángulos y botiquín presentes", Menor),
            item("CAR-01", "Carrocería", "Carrocería sin elementos sueltos", Menor),
            item("CAR-02", "Carrocería", "Pintura y rotulación en buen estado", Leve),
            item("DOC-01", "Documentación", "Revisión técnica y permiso de circulación vigentes", Mayor),
            item("DOC-02", "Documentación", "Seguro obligatorio vigente", Menor),
            item("MOT-01", "Motor", "Sin fugas de aceite o combustible", Mayor),
            item("MOT-02", "Motor", "Emisión de humo visible dentro de norma", Leve),
        ]
    };
}

/// Buscar un ítem del catálogo por código
pub fn buscar_item(codigo: &str) -> Option<&'static ChecklistItem> {
    CATALOGO.iter().find(|item| item.codigo == codigo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogo_codes_are_unique() {
        let codigos: HashSet<_> = CATALOGO.iter().map(|i| i.codigo).collect();
        assert_eq!(codigos.len(), CATALOGO.len());
    }

    #[test]
    fn test_catalogo_covers_every_level() {
        for nivel in NivelSeveridad::TODOS {
            assert!(CATALOGO.iter().any(|i| i.nivel == nivel), "falta nivel {:?}", nivel);
        }
    }

    #[test]
    fn test_nivel_conversions() {
        assert_eq!(NivelSeveridad::try_from(1u8), Ok(NivelSeveridad::Critico));
        assert!(NivelSeveridad::try_from(5u8).is_err());
        assert!(NivelSeveridad::try_from(-1i16).is_err());
        assert_eq!(NivelSeveridad::Leve.as_i16(), 4);
    }

    #[test]
    fn test_estado_respuesta_serde() {
        let estado: EstadoRespuesta = serde_json::from_str("\"no_cumple\"").unwrap();
        assert_eq!(estado, EstadoRespuesta::NoCumple);
        assert_eq!(serde_json::to_string(&EstadoRespuesta::NoAplica).unwrap(), "\"no_aplica\"");
    }

    #[test]
    fn test_buscar_item() {
        assert_eq!(buscar_item("FRN-01").map(|i| i.nivel), Some(NivelSeveridad::Critico));
        assert!(buscar_item("XXX-99").is_none());
    }
}
