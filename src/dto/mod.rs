pub mod admin_dto;
pub mod api_response;
pub mod cliente_dto;
pub mod flota_dto;
pub mod inspeccion_dto;
pub mod staff_dto;

pub use api_response::ApiResponse;
