// ============================================================================
// Portal Infrastructure - Redis Session Store
// File: crates/portal-infrastructure/src/cache/redis_session_store.rs
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use tracing::{debug, error, info};

use portal_core::domain::{SessionData, SessionUser};
use portal_core::error::DomainError;
use portal_core::repositories::SessionStore;
use portal_security::SessionId;

/// Session store backed by Redis. Records are JSON values under
/// `portal:sess:{sha256(token)}` and carry a Redis expiry equal to the TTL,
/// so the server never has to sweep them.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool,
}

impl RedisSessionStore {
    pub fn new(url: &str, max_connections: usize) -> Result<Self, DomainError> {
        let mut config = Config::from_url(url);
        config.pool = Some(PoolConfig::new(max_connections));
        let pool = config.create_pool(Some(Runtime::Tokio1)).map_err(|e| {
            error!("Failed to create Redis pool: {}", e);
            DomainError::SessionStoreError(e.to_string())
        })?;

        info!("Redis session store ready (max {} connections)", max_connections);
        Ok(Self { pool })
    }

    async fn connection(&self) -> Result<Connection, DomainError> {
        self.pool.get().await.map_err(|e| {
            error!("Redis pool error: {}", e);
            DomainError::SessionStoreError(e.to_string())
        })
    }
}

fn store_error(e: impl std::fmt::Display) -> DomainError {
    error!("Redis session store error: {}", e);
    DomainError::SessionStoreError(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user: SessionUser, ttl: Duration) -> Result<SessionId, DomainError> {
        let id = SessionId::generate();
        let data = SessionData::new(user, ttl);
        let payload = serde_json::to_string(&data).map_err(store_error)?;

        // Redis rejects EX 0; the payload's own expiry still applies on read.
        let seconds = ttl.as_secs().max(1);
        let mut conn = self.connection().await?;
        let _: () = conn
            .set_ex(id.storage_key(), payload, seconds)
            .await
            .map_err(store_error)?;

        debug!("Session stored in Redis with TTL {}s", seconds);
        Ok(id)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = conn.get(id.storage_key()).await.map_err(store_error)?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        let data: SessionData = serde_json::from_str(&payload).map_err(store_error)?;
        Ok((!data.is_expired()).then_some(data))
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(id.storage_key()).await.map_err(store_error)?;
        Ok(())
    }
}
