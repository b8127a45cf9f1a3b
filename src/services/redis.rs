//! Redis-backed session storage

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};

use super::sessions::SessionStore;

#[derive(Clone)]
pub struct RedisService {
    client: Client,
    session_ttl_seconds: u64,
}

impl RedisService {
    /// Create a new Redis service
    pub async fn new(url: &str, session_ttl_seconds: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        // Test connection
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self {
            client,
            session_ttl_seconds,
        })
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))
    }
}

/// One hash per session
fn session_key(session_id: &str) -> String {
    format!("session:{}", session_id)
}

#[async_trait]
impl SessionStore for RedisService {
    async fn get_int(&self, session_id: &str, name: &str) -> AppResult<Option<i64>> {
        let mut conn = self.connection().await?;

        let value: Option<i64> = conn
            .hget(session_key(session_id), name)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read session from Redis: {}", e)))?;

        Ok(value)
    }

    async fn set_int(&self, session_id: &str, name: &str, value: i64) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let key = session_key(session_id);

        // Writing refreshes the session lifetime
        redis::pipe()
            .atomic()
            .hset(&key, name, value)
            .ignore()
            .expire(&key, self.session_ttl_seconds as i64)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write session to Redis: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::session_key;

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(session_key("abc123"), "session:abc123");
    }
}
