use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use portal_core::SessionUser;
use portal_security::SessionId;

use crate::error::ApiError;
use crate::state::AppState;

/// The session identifier from the request cookie, unverified.
pub struct CurrentSession(pub Option<SessionId>);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(state.cookie.read(&parts.headers)))
    }
}

/// The identity behind a live session, or `None` for anonymous requests.
/// Gated handlers must deny access when this is `None`. A session store
/// fault rejects the request with the error page.
pub struct MaybeUser(pub Option<SessionUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session_id = state.cookie.read(&parts.headers);
        let user = state.auth.resolve_session(session_id.as_ref()).await?;
        Ok(Self(user))
    }
}
