//! Home, members, and fallback pages

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use rand::seq::IndexedRandom;
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::MaybeUser;
use crate::state::AppState;
use crate::views::Page;

pub const MEMBER_IMAGES: [&str; 3] = ["cat1.svg", "cat2.svg", "cat3.svg"];

/// Home page - GET /
pub async fn home(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Response, ApiError> {
    let html = state.pages.render(Page::Home, &json!({ "user": user }))?;
    Ok(html.into_response())
}

/// Members page - GET /members (session required)
pub async fn members(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Response, ApiError> {
    let Some(user) = user else {
        return Ok(Redirect::to("/").into_response());
    };

    let image = MEMBER_IMAGES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(MEMBER_IMAGES[0]);
    let html = state
        .pages
        .render(Page::Members, &json!({ "name": user.name, "image": image }))?;
    Ok(html.into_response())
}

pub async fn not_found(State(state): State<AppState>) -> Result<Response, ApiError> {
    let html = state.pages.render(Page::NotFound, &json!({}))?;
    Ok((StatusCode::NOT_FOUND, html).into_response())
}
