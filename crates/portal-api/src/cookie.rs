//! Session cookie encoding and extraction

use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderValue};
use portal_security::SessionId;

use crate::error::ApiError;

/// How the session identifier travels between server and browser.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    name: String,
    secure: bool,
    max_age: Duration,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, secure: bool, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            secure,
            max_age,
        }
    }

    /// `Set-Cookie` value that hands `id` to the browser.
    pub fn issue(&self, id: &SessionId) -> Result<HeaderValue, ApiError> {
        self.build(id.as_str(), self.max_age.as_secs())
    }

    /// `Set-Cookie` value that makes the browser drop the cookie.
    pub fn clear(&self) -> Result<HeaderValue, ApiError> {
        self.build("", 0)
    }

    /// Session identifier presented by the client, if well formed.
    pub fn read(&self, headers: &HeaderMap) -> Option<SessionId> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .and_then(|(_, value)| SessionId::parse(value))
    }

    fn build(&self, value: &str, max_age: u64) -> Result<HeaderValue, ApiError> {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::InternalError(format!("invalid session cookie: {}", e)))
    }
}
