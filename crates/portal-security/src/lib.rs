//! # Portal Security
//! 
//! Security utilities: password hashing and session identifiers.

pub mod password;
pub mod session;

pub use password::{Argon2Hasher, BcryptHasher, PasswordError, PasswordHasher};
pub use session::SessionId;
