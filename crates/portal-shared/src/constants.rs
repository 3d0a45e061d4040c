//! Application-wide constants

/// Sessions live for one hour from creation, never extended.
pub const SESSION_TTL_SECONDS: u64 = 60 * 60;
pub const SESSION_COOKIE_NAME: &str = "portal.sid";
pub const SESSION_KEY_PREFIX: &str = "portal:sess:";

pub const DEFAULT_BCRYPT_COST: u32 = 10;
