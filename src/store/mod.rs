//! # Key-Value Store
//!
//! Caixa de correio transitória entre as etapas do fluxo OAuth: o state
//! pendente e depois as credenciais ficam aqui com TTL, nunca em memória
//! do handler. Dois backends atrás do mesmo trait:
//!
//! - `memory.rs`: processo único (desenvolvimento e testes)
//! - `redis.rs`: múltiplas instâncias

pub mod memory;
pub mod redis;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{StoreBackend, StoreSettings};
use crate::utils::{AppError, AppResult};

pub use memory::InMemoryStore;
pub use self::redis::RedisStore;

/// Operações atômicas por chave que o fluxo precisa do cache externo
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Grava `value` em `key`, expirando após `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Valor atual; chave ausente ou expirada retorna `None`
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Remove a chave; remover chave inexistente não é erro
    async fn delete(&self, key: &str) -> AppResult<()>;

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Cria o backend configurado
pub async fn from_settings(settings: &StoreSettings) -> AppResult<SharedStore> {
    match settings.backend {
        StoreBackend::Memory => Ok(Arc::new(InMemoryStore::with_cleanup(
            settings.cleanup_interval(),
        ))),
        StoreBackend::Redis => {
            let url = settings.redis_url.as_deref().ok_or_else(|| {
                AppError::ConfigError("store.redis_url é obrigatório com backend redis".to_string())
            })?;
            let store = RedisStore::connect(url, settings.key_prefix.clone()).await?;
            Ok(Arc::new(store))
        }
    }
}
