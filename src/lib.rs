//! PETRAN - plataforma de inspección de flotas de camiones
//!
//! Portal de clientes, back-office de agenda y ejecución de inspecciones
//! con checklist y puntaje.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
