//! Configuração OAuth2 do app HubSpot
//!
//! Centraliza client id, secret, redirect e endpoints. Os endpoints ficam
//! configuráveis para permitir apontar os testes para um servidor mock.

use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTHORIZE_URL: &str = "https://app.hubspot.com/oauth/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://api.hubapi.com/oauth/v1/token";
pub const DEFAULT_API_BASE_URL: &str = "https://api.hubapi.com";

/// Escopos mínimos para leitura de contatos
pub const DEFAULT_SCOPES: &[&str] = &["crm.objects.contacts.read", "oauth"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubSpotConfig {
    /// Client ID do app público no HubSpot
    pub client_id: String,

    /// Client Secret do app
    pub client_secret: String,

    /// URL de callback registrada no app
    pub redirect_uri: String,

    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

fn default_authorize_url() -> String {
    DEFAULT_AUTHORIZE_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl HubSpotConfig {
    /// Cria configuração com os endpoints públicos do HubSpot
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: default_scopes(),
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            api_base_url: default_api_base_url(),
        }
    }

    /// Substitui os três endpoints por uma única base (servidor mock)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.authorize_url = format!("{}/oauth/authorize", base);
        self.token_url = format!("{}/oauth/v1/token", base);
        self.api_base_url = base.to_string();
        self
    }

    /// Escopos no formato do HubSpot (separados por espaço)
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    /// Gerar URL de autorização com o `state` já codificado pelo chamador
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}",
            self.authorize_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.scope()),
            urlencoding::encode(state)
        )
    }

    pub fn contacts_url(&self) -> String {
        format!(
            "{}/crm/v3/objects/contacts",
            self.api_base_url.trim_end_matches('/')
        )
    }
}
