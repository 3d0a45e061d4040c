use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info};

use portal_core::domain::{SessionData, SessionUser};
use portal_core::error::DomainError;
use portal_core::repositories::SessionStore;
use portal_security::SessionId;

/// Thread-safe in-memory session store.
///
/// Expired records are dropped lazily on read; [`cleanup_expired`] sweeps the
/// ones nobody reads again.
///
/// [`cleanup_expired`]: InMemorySessionStore::cleanup_expired
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<DashMap<String, SessionData>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        info!("Initializing in-memory session store");
        Self::default()
    }

    /// Removes every expired session, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let start_len = self.sessions.len();
        self.sessions.retain(|_, data| !data.is_expired());
        let count = start_len.saturating_sub(self.sessions.len());

        if count > 0 {
            info!("Cleaned up {} expired sessions", count);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, user: SessionUser, ttl: Duration) -> Result<SessionId, DomainError> {
        let id = SessionId::generate();
        self.sessions.insert(id.storage_key(), SessionData::new(user, ttl));
        Ok(id)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError> {
        let key = id.storage_key();
        let Some(entry) = self.sessions.get(&key) else {
            return Ok(None);
        };
        let data = entry.value().clone();
        drop(entry); // Release read lock

        if data.is_expired() {
            self.sessions.remove(&key);
            debug!("Session expired, removed from store");
            return Ok(None);
        }
        Ok(Some(data))
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), DomainError> {
        self.sessions.remove(&id.storage_key());
        Ok(())
    }
}
