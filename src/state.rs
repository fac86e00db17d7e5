use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::{BotError, BotResult},
    service::ServiceRegistry,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: ServiceRegistry,
}

impl AppState {
    pub fn new(config: AppConfig) -> BotResult<Self> {
        let services = ServiceRegistry::new(&config).map_err(BotError::BackendUnavailable)?;

        Ok(Self {
            config: Arc::new(config),
            services,
        })
    }

    #[cfg(test)]
    pub fn with_backend(config: AppConfig, backend: Arc<dyn crate::service::http::BackendApi>) -> Self {
        let services = ServiceRegistry::with_backend(&config, backend);
        Self {
            config: Arc::new(config),
            services,
        }
    }
}
