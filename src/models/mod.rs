//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean al schema
//! PostgreSQL y los tipos de dominio (estados, roles, checklist).

pub mod camion;
pub mod checklist;
pub mod empresa;
pub mod foto;
pub mod inspeccion;
pub mod usuario;
