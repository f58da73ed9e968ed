use crate::dto::inspeccion_dto::InformeInspeccion;
use crate::dto::ApiResponse;
use crate::middleware::auth::SesionCualquiera;
use crate::models::empresa::EmpresaResponse;
use crate::models::foto::FotoContenido;
use crate::repositories::camion_repository::CamionRepository;
use crate::repositories::empresa_repository::EmpresaRepository;
use crate::repositories::foto_repository::FotoRepository;
use crate::repositories::inspeccion_repository::InspeccionRepository;
use crate::repositories::usuario_repository::UsuarioRepository;
use crate::utils::errors::{AppError, AppResult};
use sqlx::PgPool;
use uuid::Uuid;

pub struct InformeController {
    inspecciones: InspeccionRepository,
    camiones: CamionRepository,
    empresas: EmpresaRepository,
    usuarios: UsuarioRepository,
    fotos: FotoRepository,
}

impl InformeController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            inspecciones: InspeccionRepository::new(pool.clone()),
            camiones: CamionRepository::new(pool.clone()),
            empresas: EmpresaRepository::new(pool.clone()),
            usuarios: UsuarioRepository::new(pool.clone()),
            fotos: FotoRepository::new(pool),
        }
    }

    /// Informe completo de una inspección
    pub async fn informe(
        &self,
        sesion: &SesionCualquiera,
        id: Uuid,
    ) -> Result<ApiResponse<InformeInspeccion>, AppError> {
        let inspeccion = self
            .inspecciones
            .find_by_id(id)
            .await?
            .ok_or_else(no_encontrada)?;

        let camion = self
            .camiones
            .find_by_id(inspeccion.camion_id)
            .await?
            .ok_or_else(no_encontrada)?;
        let empresa_id = self
            .camiones
            .find_empresa_id(camion.id)
            .await?
            .ok_or_else(no_encontrada)?;

        verificar_acceso(sesion, empresa_id)?;

        let empresa = self
            .empresas
            .find_by_id(empresa_id)
            .await?
            .ok_or_else(no_encontrada)?;

        let inspector_nombre = match inspeccion.inspector_id {
            Some(inspector_id) => self.usuarios.find_by_id(inspector_id).await?.map(|u| u.nombre),
            None => None,
        };

        let (detalles, fotos) = futures::try_join!(
            self.inspecciones.detalles(id),
            self.fotos.list_by_inspeccion(id),
        )?;

        Ok(ApiResponse::success(InformeInspeccion {
            inspeccion,
            camion,
            empresa: EmpresaResponse::from(empresa),
            inspector_nombre,
            detalles,
            fotos,
        }))
    }

    /// Contenido de una foto, si la sesión puede verla
    pub async fn foto(&self, sesion: &SesionCualquiera, id: Uuid) -> AppResult<FotoContenido> {
        let foto = self
            .fotos
            .find_contenido(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Foto no encontrada".to_string()))?;

        if let SesionCualquiera::Cliente(_) = sesion {
            let inspeccion = self
                .inspecciones
                .find_by_id(foto.inspeccion_id)
                .await?
                .ok_or_else(no_encontrada)?;
            let empresa_id = self
                .camiones
                .find_empresa_id(inspeccion.camion_id)
                .await?
                .ok_or_else(no_encontrada)?;
            verificar_acceso(sesion, empresa_id)
                .map_err(|_| AppError::NotFound("Foto no encontrada".to_string()))?;
        }

        Ok(foto)
    }
}

fn no_encontrada() -> AppError {
    AppError::NotFound("Inspección no encontrada".to_string())
}

/// Staff ve todo; un cliente solo lo de su empresa (lo ajeno se reporta como inexistente)
fn verificar_acceso(sesion: &SesionCualquiera, empresa_id: Uuid) -> AppResult<()> {
    match sesion {
        SesionCualquiera::Staff(_) => Ok(()),
        SesionCualquiera::Cliente(cliente) if cliente.empresa_id == empresa_id => Ok(()),
        SesionCualquiera::Cliente(_) => Err(no_encontrada()),
    }
}
