// Biblioteca do middleware de integração HubSpot
// Expõe módulos para uso em testes e no binário

pub mod config;
pub mod handlers;
pub mod integrations;
pub mod store;
pub mod utils;

use std::sync::Arc;

use integrations::HubSpotIntegration;
use store::SharedStore;
use utils::{AppError, AppResult};

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub hubspot: Arc<HubSpotIntegration>,
}

impl AppState {
    /// Monta o estado a partir das configurações e de um store já conectado
    pub fn new(settings: config::Settings, store: SharedStore) -> AppResult<Self> {
        let client = hubspot::HubSpotClient::new(settings.hubspot.to_client_config())
            .map_err(|e| AppError::ConfigError(format!("Failed to create HubSpot client: {}", e)))?;

        let hubspot = HubSpotIntegration::new(client, store, settings.store.ttl());

        Ok(Self {
            settings,
            hubspot: Arc::new(hubspot),
        })
    }
}
