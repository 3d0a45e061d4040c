//! Session store trait (port)

use std::time::Duration;

use async_trait::async_trait;
use portal_security::SessionId;

use crate::domain::{SessionData, SessionUser};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session under a freshly generated identifier.
    async fn create(&self, user: SessionUser, ttl: Duration) -> Result<SessionId, DomainError>;

    /// Returns `None` for unknown, destroyed, or expired sessions.
    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError>;

    /// Destroying an unknown session is not an error.
    async fn destroy(&self, id: &SessionId) -> Result<(), DomainError>;
}
