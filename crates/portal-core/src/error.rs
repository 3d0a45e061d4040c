//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Please fill in all fields.")]
    MissingFields,

    #[error("{0}")]
    ValidationError(String),

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// Shared by unknown-email and wrong-password failures.
    #[error("User and password not found.")]
    InvalidCredentials,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Session store error: {0}")]
    SessionStoreError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Expected outcomes the user can fix by changing their input. Everything
    /// else is a fault of the request and surfaces as a generic failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DomainError::MissingFields
                | DomainError::ValidationError(_)
                | DomainError::DuplicateEmail(_)
                | DomainError::InvalidCredentials
        )
    }
}
