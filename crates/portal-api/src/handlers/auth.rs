// ============================================================================
// Portal API - Auth Handlers
// File: crates/portal-api/src/handlers/auth.rs
// ============================================================================
//! Signup, login, and logout handlers

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use portal_core::validation::{LoginRequest, SignupRequest};
use portal_core::{AuthSession, DomainError, SessionId};
use tracing::debug;

use crate::error::ApiError;
use crate::middleware::CurrentSession;
use crate::state::AppState;
use crate::views::Page;

const LOGIN_MISSING_FIELDS: &str = "Please enter both email and password.";

/// Sign up page - GET /signup
pub async fn signup_page(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(state.pages.form(Page::Signup, None)?.into_response())
}

/// Sign up handler - POST /signup
pub async fn signup(
    State(state): State<AppState>,
    CurrentSession(previous): CurrentSession,
    form: Result<Form<SignupRequest>, FormRejection>,
) -> Result<Response, ApiError> {
    let form = form_or_empty(form);
    match state.auth.signup(&form).await {
        Ok(session) => start_session(&state, previous, &session).await,
        Err(e) if e.is_user_error() => {
            let message = e.to_string();
            rerender(&state, Page::Signup, &e, &message)
        }
        Err(e) => Err(e.into()),
    }
}

/// Log in page - GET /login
pub async fn login_page(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(state.pages.form(Page::Login, None)?.into_response())
}

/// Log in handler - POST /login
pub async fn login(
    State(state): State<AppState>,
    CurrentSession(previous): CurrentSession,
    form: Result<Form<LoginRequest>, FormRejection>,
) -> Result<Response, ApiError> {
    let form = form_or_empty(form);
    match state.auth.login(&form).await {
        Ok(session) => start_session(&state, previous, &session).await,
        Err(e) if e.is_user_error() => {
            let message = match e {
                DomainError::MissingFields => LOGIN_MISSING_FIELDS.to_string(),
                _ => e.to_string(),
            };
            rerender(&state, Page::Login, &e, &message)
        }
        Err(e) => Err(e.into()),
    }
}

/// Logout handler - GET /logout
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session_id): CurrentSession,
) -> Result<Response, ApiError> {
    state.auth.logout(session_id.as_ref()).await;
    let cleared = state.cookie.clear()?;
    Ok(([(header::SET_COOKIE, cleared)], Redirect::to("/")).into_response())
}

/// A body that isn't a urlencoded form carries no fields at all.
fn form_or_empty<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("Unreadable form body treated as empty: {}", rejection);
            T::default()
        }
    }
}

/// Hands the new session to the browser. The session the client presented
/// before, if any, is destroyed so it can't be replayed.
async fn start_session(
    state: &AppState,
    previous: Option<SessionId>,
    session: &AuthSession,
) -> Result<Response, ApiError> {
    if previous.is_some() {
        state.auth.logout(previous.as_ref()).await;
    }
    let cookie = state.cookie.issue(&session.session_id)?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/members")).into_response())
}

fn rerender(state: &AppState, page: Page, e: &DomainError, message: &str) -> Result<Response, ApiError> {
    let html = state.pages.form(page, Some(message))?;
    Ok((status_for(e), html).into_response())
}

fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::DuplicateEmail(_) => StatusCode::CONFLICT,
        DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        _ => StatusCode::BAD_REQUEST,
    }
}
