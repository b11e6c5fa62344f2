//! In-memory property store
//!
//! Keeps provider records in a process-local map. Intended for development
//! and tests; nothing survives a restart.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use mf_core::domain::entities::ProviderProperties;
use mf_core::services::provider::PropertyStore;

/// Process-local property store
#[derive(Debug, Default)]
pub struct InMemoryPropertyStore {
    records: RwLock<HashMap<String, ProviderProperties>>,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn load(&self, user_id: &str) -> Result<Option<ProviderProperties>, String> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn create(&self, user_id: &str, props: &ProviderProperties) -> Result<(), String> {
        let mut records = self.records.write().await;
        if records.contains_key(user_id) {
            return Err(format!("provider entry already exists for user {}", user_id));
        }
        records.insert(user_id.to_string(), props.clone());
        Ok(())
    }

    async fn update(&self, user_id: &str, props: &ProviderProperties) -> Result<(), String> {
        self.records
            .write()
            .await
            .insert(user_id.to_string(), props.clone());
        Ok(())
    }

    async fn exists(&self, user_id: &str) -> Result<bool, String> {
        Ok(self.records.read().await.contains_key(user_id))
    }
}
