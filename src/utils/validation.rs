//! Utilidades de validación
//!
//! Este módulo contiene validadores de dominio (RUT, patentes, PIN) usables
//! desde `#[validate(custom = "...")]` y funciones de normalización.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Patentes chilenas: formato nuevo `BBBB12` y antiguo `AB1234`
    static ref PATENTE_RE: Regex = Regex::new(r"^([B-DF-HJ-LPR-TV-Z]{4}\d{2}|[A-Z]{2}\d{4})$").unwrap();
    static ref RUT_RE: Regex = Regex::new(r"^\d{7,8}-[\dK]$").unwrap();
    static ref PIN_RE: Regex = Regex::new(r"^\d{4}$").unwrap();
}

fn error(code: &'static str, message: &'static str, value: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error.add_param("value".into(), &value.to_string());
    error
}

/// Normalizar un RUT: sin puntos ni espacios, DV en mayúscula, con guión
pub fn normalizar_rut(value: &str) -> String {
    let limpio: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase();

    if limpio.len() < 2 {
        return limpio;
    }
    let (cuerpo, dv) = limpio.split_at(limpio.len() - 1);
    format!("{}-{}", cuerpo, dv)
}

/// Dígito verificador módulo 11
pub fn digito_verificador(cuerpo: &str) -> Option<char> {
    let mut suma = 0u32;
    let mut factor = 2u32;
    for c in cuerpo.chars().rev() {
        suma += c.to_digit(10)? * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }
    match 11 - (suma % 11) {
        11 => Some('0'),
        10 => Some('K'),
        n => char::from_digit(n, 10),
    }
}

/// Validar un RUT chileno (formato y dígito verificador)
pub fn validate_rut(value: &str) -> Result<(), ValidationError> {
    let rut = normalizar_rut(value);
    if !RUT_RE.is_match(&rut) {
        return Err(error("rut", "Formato de RUT inválido", value));
    }
    let (cuerpo, dv) = rut.split_once('-').unwrap_or((&rut, ""));
    match digito_verificador(cuerpo) {
        Some(esperado) if dv.starts_with(esperado) => Ok(()),
        _ => Err(error("rut", "Dígito verificador inválido", value)),
    }
}

/// Normalizar una patente: mayúsculas, sin guiones, puntos ni espacios
pub fn normalizar_patente(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

/// Validar formato de patente
pub fn validate_patente(value: &str) -> Result<(), ValidationError> {
    if !PATENTE_RE.is_match(&normalizar_patente(value)) {
        return Err(error("patente", "Formato de patente inválido", value));
    }
    Ok(())
}

/// Validar PIN de 4 dígitos
pub fn validate_pin(value: &str) -> Result<(), ValidationError> {
    if !PIN_RE.is_match(value) {
        return Err(error("pin", "El PIN debe tener exactamente 4 dígitos", "****"));
    }
    Ok(())
}

/// Validar año de fabricación razonable
pub fn validate_anio(value: i32) -> Result<(), ValidationError> {
    let max = chrono::Utc::now().format("%Y").to_string().parse::<i32>().unwrap_or(2100) + 1;
    if !(1950..=max).contains(&value) {
        return Err(error("anio", "Año fuera de rango", &value.to_string()));
    }
    Ok(())
}
