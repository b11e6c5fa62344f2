//! Redis-backed property store
//!
//! Stores one JSON record per (provider, user) under
//! `mfa:props:{provider}:{user}`. Records are durable configuration, not
//! ephemeral codes, so no TTL is set.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use mf_core::domain::entities::ProviderProperties;
use mf_core::services::provider::PropertyStore;

use crate::InfrastructureError;

/// Redis key prefix for provider property records
const PROPS_KEY_PREFIX: &str = "mfa:props";

/// Durable property store on Redis
pub struct RedisPropertyStore {
    client: redis::Client,
    provider_id: String,
}

impl RedisPropertyStore {
    /// Create a store for one provider identifier
    ///
    /// # Arguments
    ///
    /// * `redis_url` - Connection URL, e.g. `redis://127.0.0.1:6379/0`
    /// * `provider_id` - Provider identifier the records are scoped to
    pub fn new(redis_url: &str, provider_id: &str) -> Result<Self, InfrastructureError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| InfrastructureError::Store(format!("invalid Redis URL: {}", e)))?;

        Ok(Self {
            client,
            provider_id: provider_id.to_string(),
        })
    }

    /// Format the record key for a user
    fn record_key(&self, user_id: &str) -> String {
        format!("{}:{}:{}", PROPS_KEY_PREFIX, self.provider_id, user_id)
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, String> {
        self.client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| format!("Redis connection failed: {}", e))
    }

    fn encode(props: &ProviderProperties) -> Result<String, String> {
        serde_json::to_string(props).map_err(|e| format!("failed to serialize record: {}", e))
    }
}

#[async_trait]
impl PropertyStore for RedisPropertyStore {
    async fn load(&self, user_id: &str) -> Result<Option<ProviderProperties>, String> {
        let key = self.record_key(user_id);
        let mut con = self.connection().await?;

        let raw: Option<String> = con
            .get(&key)
            .await
            .map_err(|e| format!("Redis GET failed: {}", e))?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| format!("failed to deserialize record {}: {}", key, e)),
            None => Ok(None),
        }
    }

    async fn create(&self, user_id: &str, props: &ProviderProperties) -> Result<(), String> {
        let key = self.record_key(user_id);
        let json = Self::encode(props)?;
        let mut con = self.connection().await?;

        let created: bool = con
            .set_nx(&key, json)
            .await
            .map_err(|e| format!("Redis SETNX failed: {}", e))?;
        if !created {
            return Err(format!("provider entry already exists for user {}", user_id));
        }

        debug!(key = key.as_str(), "Created provider property record");
        Ok(())
    }

    async fn update(&self, user_id: &str, props: &ProviderProperties) -> Result<(), String> {
        let key = self.record_key(user_id);
        let json = Self::encode(props)?;
        let mut con = self.connection().await?;

        let _: () = con
            .set(&key, json)
            .await
            .map_err(|e| format!("Redis SET failed: {}", e))?;

        debug!(key = key.as_str(), "Updated provider property record");
        Ok(())
    }

    async fn exists(&self, user_id: &str) -> Result<bool, String> {
        let key = self.record_key(user_id);
        let mut con = self.connection().await?;

        con.exists(&key)
            .await
            .map_err(|e| format!("Redis EXISTS failed: {}", e))
    }
}
