use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::KeyValueStore;
use crate::utils::AppResult;
use crate::utils::logging::*;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Store em memória com expiração por entrada
///
/// Usa `tokio::time::Instant`, então respeita relógio pausado em testes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<EntryMap>,
}

type EntryMap = RwLock<HashMap<String, Entry>>;

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store com limpeza periódica das entradas vencidas
    ///
    /// A task guarda só uma referência fraca ao mapa e termina quando o
    /// último clone do store é liberado. Precisa de um runtime tokio ativo.
    pub fn with_cleanup(cleanup_interval: Duration) -> Self {
        let store = Self::new();
        let weak_entries: Weak<EntryMap> = Arc::downgrade(&store.entries);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(cleanup_interval);
            loop {
                interval.tick().await;
                let Some(entries) = weak_entries.upgrade() else {
                    tracing::debug!("[Store] Cleanup task encerrada: store liberado");
                    break;
                };
                let removed = purge(&entries).await;
                if removed > 0 {
                    tracing::debug!("[Store] {} entradas vencidas removidas", removed);
                }
            }
        });

        store
    }

    /// Remove entradas vencidas e retorna quantas saíram
    pub async fn purge_expired(&self) -> usize {
        purge(&self.entries).await
    }

    /// Número de entradas ainda válidas
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

async fn purge(entries: &EntryMap) -> usize {
    let now = Instant::now();
    let mut entries = entries.write().await;
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));
    before - entries.len()
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        log_store_operation("SET", key);
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        log_store_operation("GET", key);
        let now = Instant::now();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // vencida: remover na leitura
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        log_store_operation("DEL", key);
        self.entries.write().await.remove(key);
        Ok(())
    }
}
