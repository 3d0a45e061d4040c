//! Session records

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use portal_security::SessionId;
use serde::{Deserialize, Serialize};

/// Identity carried by a session. `name` is copied from the user record when
/// the session is issued and is not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub name: String,
}

/// Server-side session payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user: SessionUser,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    /// Fixed lifetime from now; reads never extend it.
    pub fn new(user: SessionUser, ttl: Duration) -> Self {
        let created_at = Utc::now();
        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { user, created_at, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Seconds left before expiry, zero once expired.
    pub fn remaining_ttl(&self) -> Duration {
        (self.expires_at - Utc::now()).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Successful signup or login: the identifier to hand to the client plus the
/// identity it now carries.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: SessionId,
    pub user: SessionUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> SessionUser {
        SessionUser { name: "alice1".to_string() }
    }

    #[test]
    fn test_new_session_is_live_for_ttl() {
        let data = SessionData::new(alice(), Duration::from_secs(3600));
        assert!(!data.is_expired());
        assert_eq!((data.expires_at - data.created_at).num_seconds(), 3600);
        assert!(data.remaining_ttl() <= Duration::from_secs(3600));
        assert!(data.remaining_ttl() > Duration::from_secs(3590));
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let data = SessionData::new(alice(), Duration::ZERO);
        assert!(data.is_expired());
        assert_eq!(data.remaining_ttl(), Duration::ZERO);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let data = SessionData::new(alice(), Duration::MAX);
        assert_eq!(data.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!data.is_expired());
    }

    #[test]
    fn test_payload_serializes_with_user_name() {
        let data = SessionData::new(alice(), Duration::from_secs(60));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["user"]["name"], "alice1");
    }
}
