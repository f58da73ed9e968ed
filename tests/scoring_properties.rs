use std::collections::HashMap;

use petran::models::checklist::{EstadoRespuesta, NivelSeveridad, CATALOGO};
use petran::models::inspeccion::ResultadoInspeccion;
use petran::services::scoring_service::{calcular_puntaje, evaluar, ScoringError};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn nivel() -> impl Strategy<Value = NivelSeveridad> {
    prop::sample::select(NivelSeveridad::TODOS.to_vec())
}

fn estado() -> impl Strategy<Value = EstadoRespuesta> {
    prop::sample::select(vec![
        EstadoRespuesta::Cumple,
        EstadoRespuesta::NoCumple,
        EstadoRespuesta::NoAplica,
    ])
}

fn respuestas() -> impl Strategy<Value = Vec<(NivelSeveridad, EstadoRespuesta)>> {
    prop::collection::vec((nivel(), estado()), 0..60)
}

/// Respuestas completas para el catálogo
fn checklist_completo() -> impl Strategy<Value = HashMap<String, EstadoRespuesta>> {
    prop::collection::vec(estado(), CATALOGO.len()).prop_map(|estados| {
        CATALOGO
            .iter()
            .zip(estados)
            .map(|(item, estado)| (item.codigo.to_string(), estado))
            .collect()
    })
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn puntaje_siempre_entre_0_y_100(respuestas in respuestas()) {
        prop_assert!(calcular_puntaje(respuestas) <= 100);
    }

    #[test]
    fn una_falla_mas_nunca_sube_el_puntaje(respuestas in respuestas(), extra in nivel()) {
        let base = calcular_puntaje(respuestas.clone());
        let mut con_falla = respuestas;
        con_falla.push((extra, EstadoRespuesta::NoCumple));
        prop_assert!(calcular_puntaje(con_falla) <= base);
    }

    #[test]
    fn no_aplica_equivale_a_excluir(respuestas in respuestas()) {
        let sin_na: Vec<_> = respuestas
            .iter()
            .copied()
            .filter(|(_, e)| *e != EstadoRespuesta::NoAplica)
            .collect();
        prop_assert_eq!(calcular_puntaje(respuestas), calcular_puntaje(sin_na));
    }

    #[test]
    fn puntaje_igual_a_descuento_acotado(respuestas in respuestas()) {
        let descuento: u32 = respuestas
            .iter()
            .filter(|(_, e)| *e == EstadoRespuesta::NoCumple)
            .map(|(n, _)| n.penalizacion())
            .sum();
        let esperado = 100u32.saturating_sub(descuento) as u8;
        prop_assert_eq!(calcular_puntaje(respuestas), esperado);
    }

    #[test]
    fn resultado_consistente_con_umbrales(checklist in checklist_completo()) {
        let evaluacion = evaluar(&CATALOGO, &checklist).expect("checklist completo");
        let esperado = if evaluacion.puntaje >= 80 {
            ResultadoInspeccion::Aprobada
        } else if evaluacion.puntaje >= 60 {
            ResultadoInspeccion::Observacion
        } else {
            ResultadoInspeccion::Rechazada
        };
        prop_assert_eq!(evaluacion.resultado, esperado);

        let total = evaluacion.items_cumple + evaluacion.items_no_aplica + evaluacion.total_fallas();
        prop_assert_eq!(total as usize, CATALOGO.len());
    }

    #[test]
    fn falta_un_item_es_incompleto(checklist in checklist_completo(), indice in 0..24usize) {
        let mut checklist = checklist;
        let codigo = CATALOGO[indice % CATALOGO.len()].codigo.to_string();
        checklist.remove(&codigo);

        match evaluar(&CATALOGO, &checklist) {
            Err(ScoringError::Incompleto { faltantes, codigos }) => {
                prop_assert_eq!(faltantes, 1);
                prop_assert_eq!(codigos, vec![codigo]);
            }
            otro => prop_assert!(false, "esperaba Incompleto, obtuve {:?}", otro),
        }
    }
}
