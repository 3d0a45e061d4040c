//! User repository trait (port)

use async_trait::async_trait;
use crate::domain::User;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact, case-sensitive match on the stored email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Fails with [`DomainError::DuplicateEmail`] when the email is taken.
    /// Implementations must enforce this atomically; callers do not pre-check.
    async fn insert(&self, user: &User) -> Result<User, DomainError>;
}
