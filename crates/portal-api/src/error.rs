use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use portal_core::DomainError;
use thiserror::Error;

/// Failures that end a request with a generic error page. User-correctable
/// auth outcomes never get here; handlers render them into the form.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::InternalError(e.to_string())
    }
}

const INTERNAL_ERROR_PAGE: &str = "<!DOCTYPE html><html><head><title>Error</title></head>\
<body><h1>Something went wrong</h1><p>Please try again later.</p><a href=\"/\">Home</a></body></html>";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::TemplateError(msg) => tracing::error!("Template error: {}", msg),
            ApiError::InternalError(msg) => tracing::error!("Internal error: {}", msg),
        }
        (StatusCode::INTERNAL_SERVER_ERROR, Html(INTERNAL_ERROR_PAGE)).into_response()
    }
}
