use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use tracing::{debug, warn};

use portal_core::domain::User;
use portal_core::error::DomainError;
use portal_core::repositories::UserRepository;
use portal_shared::utils::mask_email;

/// User store keyed by email. The entry API makes check-and-insert atomic per
/// key, so concurrent signups for one email see exactly one winner.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, user: &User) -> Result<User, DomainError> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                warn!("Duplicate email rejected: {}", mask_email(&user.email));
                Err(DomainError::DuplicateEmail(user.email.clone()))
            }
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                debug!("User {} stored in memory", user.id);
                Ok(user.clone())
            }
        }
    }
}
