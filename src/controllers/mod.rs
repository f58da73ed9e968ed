pub mod admin_controller;
pub mod agenda_controller;
pub mod cliente_controller;
pub mod flota_controller;
pub mod informe_controller;
pub mod inspeccion_controller;
pub mod staff_controller;
