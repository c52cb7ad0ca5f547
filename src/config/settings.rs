use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub hubspot: HubSpotSettings,
    pub store: StoreSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HubSpotSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub authorize_url: String,
    pub token_url: String,
    pub api_base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Redis,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub redis_url: Option<String>,
    #[serde(default)]
    pub key_prefix: String,
    /// Validade do state pendente e das credenciais
    pub ttl_seconds: u64,
    /// Intervalo da limpeza de entradas vencidas (backend memory)
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

fn default_cleanup_interval_seconds() -> u64 {
    60
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

impl HubSpotSettings {
    /// O app OAuth não funciona sem client_id/client_secret; falha já na inicialização
    pub fn ensure_credentials(&self) -> Result<(), ConfigError> {
        let missing: Vec<&str> = [
            ("HUBSPOT_CLIENT_ID", self.client_id.as_str()),
            ("HUBSPOT_CLIENT_SECRET", self.client_secret.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(format!(
                "credenciais do app HubSpot ausentes: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn to_client_config(&self) -> hubspot::HubSpotConfig {
        hubspot::HubSpotConfig {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_uri: self.redirect_uri.clone(),
            scopes: self.scopes.clone(),
            authorize_url: self.authorize_url.clone(),
            token_url: self.token_url.clone(),
            api_base_url: self.api_base_url.clone(),
        }
    }
}

impl StoreSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Nunca zero: `tokio::time::interval` não aceita período nulo
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds.max(1))
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Self::defaults()?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Variáveis de ambiente específicas
        if let Ok(client_id) = std::env::var("HUBSPOT_CLIENT_ID") {
            builder = builder.set_override("hubspot.client_id", client_id)?;
        }
        if let Ok(client_secret) = std::env::var("HUBSPOT_CLIENT_SECRET") {
            builder = builder.set_override("hubspot.client_secret", client_secret)?;
        }
        if let Ok(redirect_uri) = std::env::var("HUBSPOT_REDIRECT_URI") {
            builder = builder.set_override("hubspot.redirect_uri", redirect_uri)?;
        }
        if let Ok(redis_url) = std::env::var("REDIS_URL") {
            builder = builder
                .set_override("store.backend", "redis")?
                .set_override("store.redis_url", redis_url)?;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse::<i64>().ok()) {
            builder = builder.set_override("server.port", port)?;
        }

        // Demais chaves: HUBSPOT_MIDDLEWARE__STORE__TTL_SECONDS=300, etc.
        builder = builder.add_source(
            Environment::with_prefix("HUBSPOT_MIDDLEWARE")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("hubspot.scopes")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Defaults equivalentes ao ambiente local (backend em :8000, frontend em :3000)
    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("hubspot.client_id", "")?
            .set_default("hubspot.client_secret", "")?
            .set_default(
                "hubspot.redirect_uri",
                "http://localhost:8000/integrations/hubspot/oauth2callback",
            )?
            .set_default(
                "hubspot.scopes",
                hubspot::config::DEFAULT_SCOPES
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>(),
            )?
            .set_default("hubspot.authorize_url", hubspot::config::DEFAULT_AUTHORIZE_URL)?
            .set_default("hubspot.token_url", hubspot::config::DEFAULT_TOKEN_URL)?
            .set_default("hubspot.api_base_url", hubspot::config::DEFAULT_API_BASE_URL)?
            .set_default("store.backend", "memory")?
            .set_default("store.key_prefix", "")?
            .set_default("store.ttl_seconds", 600)?
            .set_default("store.cleanup_interval_seconds", 60)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000".to_string()])
    }
}
