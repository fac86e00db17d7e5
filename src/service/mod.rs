use std::sync::Arc;

use api::ApiService;
use dialogue::DialogueService;
use http::{BackendApi, HttpBackend};
use session::SessionService;

use crate::{config::AppConfig, service::api::ApiError};

pub mod api;
pub mod dialogue;
pub mod http;
pub mod session;

#[derive(Clone)]
pub struct ServiceRegistry {
    pub api: ApiService,
    pub dialogue: DialogueService,
    pub session: SessionService,
}

impl ServiceRegistry {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        info!("Initializing service registry");

        let backend = HttpBackend::new(&config.api)?;
        let registry = Self::with_backend(config, Arc::new(backend));

        info!("Service registry initialized (backend: {})", config.api.base_url);
        Ok(registry)
    }

    pub fn with_backend(config: &AppConfig, backend: Arc<dyn BackendApi>) -> Self {
        Self {
            api: ApiService::new(backend),
            dialogue: DialogueService::new(config.dialogue.timeout),
            session: SessionService::new(),
        }
    }
}
