//! Backend Redis para o key-value store
//!
//! `SET key value EX ttl` em uma única operação, `GET` e `DEL`. O
//! `ConnectionManager` reconecta sozinho e é barato de clonar por chamada.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

use super::KeyValueStore;
use crate::utils::{AppError, AppResult};
use crate::utils::logging::*;

#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    pub async fn connect(redis_url: &str, key_prefix: String) -> AppResult<Self> {
        log_info(&format!("🔌 [Store] Conectando ao Redis em {}", redis_url));

        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::StoreError(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::StoreError(format!("Failed to connect to Redis: {}", e)))?;

        log_info("✅ [Store] Redis conectado");

        Ok(Self { manager, key_prefix })
    }

    fn prefixed_key(&self, key: &str) -> String {
        prefixed(&self.key_prefix, key)
    }
}

fn prefixed(prefix: &str, key: &str) -> String {
    format!("{}{}", prefix, key)
}

/// Redis rejeita `EX 0`; o menor TTL aceito é 1s
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let key = self.prefixed_key(key);
        log_store_operation("SET", &key);

        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(&key, value, ttl_secs(ttl)).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let key = self.prefixed_key(key);
        log_store_operation("GET", &key);

        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(&key).await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let key = self.prefixed_key(key);
        log_store_operation("DEL", &key);

        let mut conn = self.manager.clone();
        conn.del::<_, ()>(&key).await?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
