//! Opaque session identifiers

use std::fmt;

use portal_shared::constants::SESSION_KEY_PREFIX;
use rand::Rng;
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

/// Random 256-bit token handed to the client in the session cookie.
///
/// Stores never see the raw token: records are keyed by [`SessionId::storage_key`],
/// a SHA-256 digest, so a dump of the session store can't be replayed as cookies.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        let token: [u8; TOKEN_BYTES] = rand::rng().random();
        Self(hex::encode(token))
    }

    /// Accepts a client-presented value only if it has the shape of a token
    /// we could have issued.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let well_formed = value.len() == TOKEN_BYTES * 2
            && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        well_formed.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn storage_key(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        format!("{}{}", SESSION_KEY_PREFIX, hex::encode(digest))
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionId").field(&"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique_and_parseable() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 64);
        assert_eq!(SessionId::parse(a.as_str()), Some(a));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(SessionId::parse("").is_none());
        assert!(SessionId::parse("abc").is_none());
        assert!(SessionId::parse(&"G".repeat(64)).is_none());
        assert!(SessionId::parse(&"A".repeat(64)).is_none());
    }

    #[test]
    fn test_storage_key_hides_token() {
        let id = SessionId::generate();
        let key = id.storage_key();
        assert!(key.starts_with("portal:sess:"));
        assert!(!key.contains(id.as_str()));
        assert_eq!(key, id.storage_key());
    }

    #[test]
    fn test_debug_is_redacted() {
        let id = SessionId::generate();
        assert!(!format!("{:?}", id).contains(id.as_str()));
    }
}
