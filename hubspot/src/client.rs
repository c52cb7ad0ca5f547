//! Cliente HTTP para OAuth2 e CRM do HubSpot

use crate::config::HubSpotConfig;
use crate::error::{HubSpotError, Result};
use crate::types::ContactsPage;
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Cliente HubSpot construído a partir de uma configuração explícita
#[derive(Clone, Debug)]
pub struct HubSpotClient {
    http_client: HttpClient,
    config: HubSpotConfig,
}

impl HubSpotClient {
    /// Cria um novo cliente HubSpot
    ///
    /// # Timeouts
    ///
    /// - Total: 30s
    /// - Connect: 5s
    pub fn new(config: HubSpotConfig) -> Result<Self> {
        if config.client_id.is_empty() {
            return Err(HubSpotError::config_error("client_id vazio"));
        }

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                HubSpotError::config_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &HubSpotConfig {
        &self.config
    }

    pub fn authorization_url(&self, state: &str) -> String {
        self.config.authorization_url(state)
    }

    /// Trocar authorization code por token
    ///
    /// Retorna o JSON bruto da resposta (access_token, refresh_token,
    /// expires_in...) sem remodelar, pois ele é repassado ao frontend.
    pub async fn exchange_code(&self, code: &str) -> Result<Value> {
        log::info!("🔐 [HubSpot] POST {} (grant_type=authorization_code)", self.config.token_url);

        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code", code),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("❌ [HubSpot] Token exchange failed: {} - {}", status, error_text);
            return Err(HubSpotError::api_error(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        let token: Value = serde_json::from_str(&body)?;

        log::info!("✅ [HubSpot] Token obtido");
        Ok(token)
    }

    /// Listar a primeira página de contatos
    ///
    /// Apenas `200 OK` conta como sucesso; qualquer outro status vira
    /// `HubSpotError::ApiError` para o chamador decidir a política.
    pub async fn list_contacts(&self, access_token: &str) -> Result<ContactsPage> {
        let url = self.config.contacts_url();

        log::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("⚠️ [HubSpot] Contacts request returned {}: {}", status, error_text);
            return Err(HubSpotError::api_error(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        let page: ContactsPage = serde_json::from_str(&body)?;

        log::info!("✅ [HubSpot] {} contatos recebidos", page.results.len());
        Ok(page)
    }
}
