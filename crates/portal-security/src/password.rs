//! Password hashing (bcrypt by default, Argon2id optional)

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use portal_shared::constants::DEFAULT_BCRYPT_COST;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Stored hash is malformed: {0}")]
    InvalidHash(String),
}

/// One-way salted password hashing.
///
/// Every call to `hash` draws a fresh salt, so two hashes of the same
/// plaintext never compare equal; `verify` is the only way to match them.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the suite fast; the scheme is identical at cost 10.
    fn bcrypt() -> BcryptHasher {
        BcryptHasher::new(4)
    }

    #[test]
    fn test_bcrypt_hash_is_salted() {
        let hasher = bcrypt();
        let first = hasher.hash("secret1").unwrap();
        let second = hasher.hash("secret1").unwrap();

        assert_ne!(first, second);
        assert_ne!(first, "secret1");
        assert!(hasher.verify("secret1", &first).unwrap());
        assert!(hasher.verify("secret1", &second).unwrap());
    }

    #[test]
    fn test_bcrypt_rejects_wrong_password() {
        let hasher = bcrypt();
        let hash = hasher.hash("secret1").unwrap();
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_bcrypt_default_cost() {
        let hash = BcryptHasher::default().hash("secret1").unwrap();
        assert!(hash.starts_with("$2b$10$"));
    }

    #[test]
    fn test_bcrypt_malformed_hash() {
        assert!(matches!(
            bcrypt().verify("secret1", "not-a-hash"),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_argon2_roundtrip() {
        let hasher = Argon2Hasher;
        let first = hasher.hash("secret1").unwrap();
        let second = hasher.hash("secret1").unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(hasher.verify("secret1", &first).unwrap());
        assert!(!hasher.verify("wrong", &first).unwrap());
        assert!(hasher.verify("secret1", "garbage").is_err());
    }
}
