//! Redis client for the storefront's server-side state
//!
//! Sessions live here as string values with a TTL, so this module only needs
//! get, set-with-expiry, delete and a ping.

use anyhow::Result;
use redis::{AsyncCommands, Client};
use tracing::info;

/// Configuration for the Redis connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> Result<Self> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        Ok(RedisConfig { url })
    }
}

/// Handle to Redis that hands out multiplexed connections
#[derive(Clone)]
pub struct RedisPool {
    client: Client,
}

impl RedisPool {
    /// Open a Redis client for the configured URL
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.clone())?;
        info!("Redis client initialized with URL: {}", config.url);
        Ok(RedisPool { client })
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        let conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn)
    }

    /// Set a key-value pair, expiring after `ttl_seconds` when given
    pub async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<()> {
        let mut conn = self.get_connection().await?;

        match ttl_seconds {
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, ttl).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }

        Ok(())
    }

    /// Get a value by key
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let removed: u64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    /// Check if Redis answers PING
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_redis_config_default_url() {
        unsafe {
            std::env::remove_var("REDIS_URL");
        }

        let config = RedisConfig::from_env().unwrap();
        assert_eq!(config.url, "redis://localhost:6379");
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_set_get_delete() -> Result<()> {
        let config = RedisConfig {
            url: "redis://localhost:6379".to_string(),
        };
        let pool = RedisPool::new(&config).await?;
        assert!(pool.health_check().await?);

        let key = "fresho:test_key";
        pool.set(key, "test_value", Some(5)).await?;
        assert_eq!(pool.get(key).await?, Some("test_value".to_string()));

        assert!(pool.delete(key).await?);
        assert_eq!(pool.get(key).await?, None);
        assert!(!pool.delete(key).await?);

        Ok(())
    }
}
