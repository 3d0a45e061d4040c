// ============================================================================
// Portal Core - Authentication Service
// File: crates/portal-core/src/services/auth_service.rs
// ============================================================================
//! Authentication service with signup, login, logout, and session resolution

use std::sync::Arc;
use std::time::Duration;

use portal_security::{PasswordHasher, SessionId};
use portal_shared::constants::SESSION_TTL_SECONDS;
use portal_shared::utils::mask_email;
use tracing::{debug, error, info, warn};

use crate::domain::{AuthSession, SessionUser, User};
use crate::error::DomainError;
use crate::repositories::{SessionStore, UserRepository};
use crate::validation::{LoginRequest, SignupRequest};

/// Authentication service for handling signup/login flows and session issuance
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    session_store: Arc<dyn SessionStore>,
    hasher: Arc<dyn PasswordHasher>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_store: Arc<dyn SessionStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repo,
            session_store,
            hasher,
            session_ttl: Duration::from_secs(SESSION_TTL_SECONDS),
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Register a new user and open a session for them
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthSession, DomainError> {
        // 1-2. Presence and shape
        let credentials = request.credentials().map_err(|e| {
            warn!("Signup rejected: {}", e);
            e
        })?;
        let email = mask_email(credentials.email);
        info!("Signup attempt for email: {}", email);

        // 3. Hash password
        let password_hash = self.hash_password(credentials.password).await?;

        // 4. Persist; the repository is the only uniqueness guard
        let user = User::new(
            credentials.name.to_string(),
            credentials.email.to_string(),
            password_hash,
        );
        let created = self.user_repo.insert(&user).await.map_err(|e| {
            match &e {
                DomainError::DuplicateEmail(_) => warn!("Signup failed: email already exists: {}", email),
                _ => error!("Signup failed persisting user {}: {}", email, e),
            }
            e
        })?;

        // 5. Issue session. The user record stays if this fails.
        let session = self.issue_session(&created.name).await.map_err(|e| {
            error!(
                "Session issuance failed after user {} was persisted: {}",
                created.id, e
            );
            e
        })?;

        info!("Signup successful for: {}", email);
        Ok(session)
    }

    /// Verify credentials and open a session
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession, DomainError> {
        let credentials = request.credentials().map_err(|e| {
            warn!("Login rejected: {}", e);
            e
        })?;
        let email = mask_email(credentials.email);
        info!("Login attempt for email: {}", email);

        // 1. Find user by email
        let user = self
            .user_repo
            .find_by_email(credentials.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: email not found: {}", email);
                DomainError::InvalidCredentials
            })?;

        // 2. Verify password
        if !self.verify_password(credentials.password, &user.password_hash).await? {
            warn!("Login failed: invalid password for: {}", email);
            return Err(DomainError::InvalidCredentials);
        }

        // 3. Issue session
        let session = self.issue_session(&user.name).await?;

        info!("Login successful for: {}", email);
        Ok(session)
    }

    /// Destroy the session, if any. Never fails from the caller's side.
    pub async fn logout(&self, session_id: Option<&SessionId>) {
        let Some(session_id) = session_id else {
            debug!("Logout without a session");
            return;
        };

        match self.session_store.destroy(session_id).await {
            Ok(()) => info!("Session destroyed"),
            Err(e) => error!("Error destroying session: {}", e),
        }
    }

    /// Resolve the identity behind a session identifier.
    ///
    /// `Ok(None)` means anonymous: no identifier, an unknown or destroyed one,
    /// or an expired one. A store that cannot answer is a fault, not anonymity.
    pub async fn resolve_session(
        &self,
        session_id: Option<&SessionId>,
    ) -> Result<Option<SessionUser>, DomainError> {
        let Some(session_id) = session_id else {
            return Ok(None);
        };

        let data = self.session_store.get(session_id).await.map_err(|e| {
            error!("Failed to resolve session: {}", e);
            e
        })?;
        Ok(data.filter(|data| !data.is_expired()).map(|data| data.user))
    }

    async fn issue_session(&self, name: &str) -> Result<AuthSession, DomainError> {
        let user = SessionUser { name: name.to_string() };
        let session_id = self
            .session_store
            .create(user.clone(), self.session_ttl)
            .await?;
        Ok(AuthSession { session_id, user })
    }

    // Hashing is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::InternalError(e.to_string()))?
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let hash = hash.to_owned();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        // A stored hash we can't parse never authenticates anyone.
        Ok(verified.unwrap_or_else(|e| {
            error!("Stored password hash rejected: {}", e);
            false
        }))
    }
}
