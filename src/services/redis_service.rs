use async_trait::async_trait;
use redis::{Client, AsyncCommands};
use std::sync::Arc;
use crate::errors::AppResult;
use super::store::KeyValueStore;

pub struct RedisService {
    client: Arc<Client>,
}

impl RedisService {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KeyValueStore for RedisService {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.get_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let mut conn = self.client.get_async_connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.client.get_async_connection().await?;
        let present: bool = conn.exists(key).await?;
        Ok(present)
    }
}

impl Clone for RedisService {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone()
        }
    }
}
