//! Estado compartido de la aplicación
//!
//! Este módulo define el estado que se pasa a través del router de Axum.

use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::services::media_service::{HttpMediaHost, MediaHost};
use crate::services::session_service::SessionService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<EnvironmentConfig>,
    pub sessions: SessionService,
    /// `None` guarda las fotos en la base de datos
    pub media: Option<Arc<dyn MediaHost>>,
    pub rate_limit: RateLimitState,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let media = config.media.clone().map(|media_config| {
            let client = Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default();
            Arc::new(HttpMediaHost::new(client, media_config)) as Arc<dyn MediaHost>
        });

        Self::with_media(pool, config, media)
    }

    /// Estado con un media host explícito
    pub fn with_media(
        pool: PgPool,
        config: EnvironmentConfig,
        media: Option<Arc<dyn MediaHost>>,
    ) -> Self {
        Self {
            sessions: SessionService::new(&config),
            rate_limit: RateLimitState::new(&config),
            media,
            pool,
            config: Arc::new(config),
        }
    }
}
