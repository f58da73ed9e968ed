pub mod camion_repository;
pub mod empresa_repository;
pub mod foto_repository;
pub mod inspeccion_repository;
pub mod usuario_repository;
