//! Services module
//!
//! Este módulo contiene la lógica de negocio que no pertenece a un único
//! repositorio: puntaje, sesiones, credenciales y fotos.

pub mod media_service;
pub mod password_service;
pub mod scoring_service;
pub mod session_service;
